//! Muted - Earthy, low-saturation tones through the day

pub const PACK: &str = r##"# Muted style pack for suntint
# Earthy, low-saturation tones through the day

[meta]
name = "Muted"
version = 1

[palettes.midnight]
editor_background = "#1c1b19"
editor_foreground = "#c9c1b1"
sidebar = "#181715"
activity_bar = "#151412"
status_bar = "#2a2723"
title_bar = "#171614"
tab_active = "#1c1b19"
tab_inactive = "#181715"
accent = "#8a7f6a"
accent_foreground = "#f2ede3"
terminal = "#1a1917"
border = "#2f2c27"

[palettes.deep_night]
editor_background = "#1e1c1a"
editor_foreground = "#c6bdad"
sidebar = "#1a1816"
activity_bar = "#161513"
status_bar = "#2d2925"
title_bar = "#191715"
tab_active = "#1e1c1a"
tab_inactive = "#1a1816"
accent = "#857a66"
accent_foreground = "#f2ede3"
terminal = "#1c1a18"
border = "#322e29"

[palettes.pre_dawn]
editor_background = "#24211f"
editor_foreground = "#cdc3b3"
sidebar = "#1f1d1b"
activity_bar = "#1b1917"
status_bar = "#3a332c"
title_bar = "#1e1c1a"
tab_active = "#24211f"
tab_inactive = "#1f1d1b"
accent = "#9c8466"
accent_foreground = "#f2ede3"
terminal = "#22201d"
border = "#3a3530"

[palettes.dawn]
editor_background = "#2e2824"
editor_foreground = "#ddd0bf"
sidebar = "#28231f"
activity_bar = "#231f1b"
status_bar = "#6e5442"
title_bar = "#26221e"
tab_active = "#2e2824"
tab_inactive = "#28231f"
accent = "#b58863"
accent_foreground = "#1e1a16"
terminal = "#2b2622"
border = "#463d35"

[palettes.sunrise]
editor_background = "#3a302a"
editor_foreground = "#e8d9c6"
sidebar = "#332a25"
activity_bar = "#2c2520"
status_bar = "#9a6b4b"
title_bar = "#31291f"
tab_active = "#3a302a"
tab_inactive = "#332a25"
accent = "#c99a6b"
accent_foreground = "#1e1a16"
terminal = "#372e28"
border = "#54473d"

[palettes.morning]
editor_background = "#f3ede2"
editor_foreground = "#3d3831"
sidebar = "#e9e1d2"
activity_bar = "#ded5c3"
status_bar = "#a68a64"
title_bar = "#e6ddcd"
tab_active = "#f3ede2"
tab_inactive = "#e4dbca"
accent = "#8f7250"
accent_foreground = "#faf7f2"
terminal = "#efe8dc"
border = "#d3c8b4"

[palettes.midday]
editor_background = "#f5f1ea"
editor_foreground = "#37332d"
sidebar = "#ece6db"
activity_bar = "#e2dacd"
status_bar = "#7d8b6a"
title_bar = "#e9e2d6"
tab_active = "#f5f1ea"
tab_inactive = "#e7e0d3"
accent = "#6b7b58"
accent_foreground = "#faf7f2"
terminal = "#f1ece4"
border = "#d6cdbd"

[palettes.afternoon]
editor_background = "#f1eadd"
editor_foreground = "#3a352e"
sidebar = "#e7dfcf"
activity_bar = "#ddd3c0"
status_bar = "#a0825a"
title_bar = "#e4dbc9"
tab_active = "#f1eadd"
tab_inactive = "#e2d9c6"
accent = "#94703f"
accent_foreground = "#faf7f2"
terminal = "#ede5d7"
border = "#d1c4ac"

[palettes.golden_hour]
editor_background = "#3b3125"
editor_foreground = "#eadbc4"
sidebar = "#342b20"
activity_bar = "#2d251c"
status_bar = "#b08449"
title_bar = "#322a1f"
tab_active = "#3b3125"
tab_inactive = "#342b20"
accent = "#c8975a"
accent_foreground = "#1e1a16"
terminal = "#382f23"
border = "#574a39"

[palettes.sunset]
editor_background = "#352a26"
editor_foreground = "#e6d3c7"
sidebar = "#2f2521"
activity_bar = "#28201d"
status_bar = "#9c5f4b"
title_bar = "#2d231f"
tab_active = "#352a26"
tab_inactive = "#2f2521"
accent = "#b5705a"
accent_foreground = "#1e1a16"
terminal = "#322824"
border = "#4f3f38"

[palettes.dusk]
editor_background = "#2b2628"
editor_foreground = "#d8ccd0"
sidebar = "#262123"
activity_bar = "#211d1f"
status_bar = "#6f5a5e"
title_bar = "#242022"
tab_active = "#2b2628"
tab_inactive = "#262123"
accent = "#937a80"
accent_foreground = "#f2ede3"
terminal = "#292426"
border = "#413a3c"

[palettes.evening]
editor_background = "#232322"
editor_foreground = "#cfcac1"
sidebar = "#1f1f1e"
activity_bar = "#1b1b1a"
status_bar = "#4f5548"
title_bar = "#1e1e1d"
tab_active = "#232322"
tab_inactive = "#1f1f1e"
accent = "#7b8470"
accent_foreground = "#f2ede3"
terminal = "#212120"
border = "#363634"

[palettes.night]
editor_background = "#1e1d1b"
editor_foreground = "#cbc4b5"
sidebar = "#1a1917"
activity_bar = "#171614"
status_bar = "#2e2b26"
title_bar = "#191816"
tab_active = "#1e1d1b"
tab_inactive = "#1a1917"
accent = "#877c67"
accent_foreground = "#f2ede3"
terminal = "#1c1b19"
border = "#312e29"
"##;
