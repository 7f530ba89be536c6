//! Vivid - Warm dawns and sunsets, cool blue nights

pub const PACK: &str = r##"# Vivid style pack for suntint
# Warm dawns and sunsets, cool blue nights

[meta]
name = "Vivid"
version = 1

[palettes.midnight]
editor_background = "#0b1026"
editor_foreground = "#c9d1f5"
sidebar = "#080c1e"
activity_bar = "#060919"
status_bar = "#141a3a"
title_bar = "#070b1c"
tab_active = "#0b1026"
tab_inactive = "#080c1e"
accent = "#5b6ee1"
accent_foreground = "#ffffff"
terminal = "#090d21"
border = "#1b2250"

[palettes.deep_night]
editor_background = "#0d1230"
editor_foreground = "#c5ccf0"
sidebar = "#0a0e27"
activity_bar = "#080b20"
status_bar = "#182046"
title_bar = "#090d24"
tab_active = "#0d1230"
tab_inactive = "#0a0e27"
accent = "#6a5acd"
accent_foreground = "#ffffff"
terminal = "#0b0f2a"
border = "#1f275a"

[palettes.pre_dawn]
editor_background = "#1a1a3e"
editor_foreground = "#d0cde8"
sidebar = "#151535"
activity_bar = "#11112c"
status_bar = "#2b2456"
title_bar = "#141432"
tab_active = "#1a1a3e"
tab_inactive = "#151535"
accent = "#9b6fd1"
accent_foreground = "#ffffff"
terminal = "#171738"
border = "#2e2a5c"

[palettes.dawn]
editor_background = "#2d2147"
editor_foreground = "#f0dde6"
sidebar = "#261c3d"
activity_bar = "#201734"
status_bar = "#6b3a6e"
title_bar = "#241a3a"
tab_active = "#2d2147"
tab_inactive = "#261c3d"
accent = "#e07a9b"
accent_foreground = "#1a1024"
terminal = "#281d40"
border = "#4a3560"

[palettes.sunrise]
editor_background = "#3b2a3a"
editor_foreground = "#fbe6d6"
sidebar = "#332432"
activity_bar = "#2b1e2a"
status_bar = "#c8553d"
title_bar = "#31222f"
tab_active = "#3b2a3a"
tab_inactive = "#332432"
accent = "#f28c45"
accent_foreground = "#1f130c"
terminal = "#352533"
border = "#5e3f4f"

[palettes.morning]
editor_background = "#fdf6e3"
editor_foreground = "#3b3a36"
sidebar = "#f4ead0"
activity_bar = "#ebdfc0"
status_bar = "#e9a23b"
title_bar = "#f1e6c8"
tab_active = "#fdf6e3"
tab_inactive = "#f0e4c5"
accent = "#d9822b"
accent_foreground = "#ffffff"
terminal = "#faf1da"
border = "#e2d3ad"

[palettes.midday]
editor_background = "#fafcff"
editor_foreground = "#24292f"
sidebar = "#eef3fa"
activity_bar = "#e3ebf6"
status_bar = "#2f80ed"
title_bar = "#eaf0f8"
tab_active = "#fafcff"
tab_inactive = "#e8eef7"
accent = "#1f6feb"
accent_foreground = "#ffffff"
terminal = "#f5f8fd"
border = "#d0d9e6"

[palettes.afternoon]
editor_background = "#fbf7ee"
editor_foreground = "#33302a"
sidebar = "#f2ecdd"
activity_bar = "#e9e1cc"
status_bar = "#d4a017"
title_bar = "#efe8d6"
tab_active = "#fbf7ee"
tab_inactive = "#eee6d2"
accent = "#c98b1d"
accent_foreground = "#ffffff"
terminal = "#f7f2e6"
border = "#ddd2b8"

[palettes.golden_hour]
editor_background = "#3a2a1c"
editor_foreground = "#f6e3c4"
sidebar = "#322418"
activity_bar = "#2a1f14"
status_bar = "#e0913a"
title_bar = "#302216"
tab_active = "#3a2a1c"
tab_inactive = "#322418"
accent = "#f4a340"
accent_foreground = "#1d140b"
terminal = "#34261a"
border = "#5c4430"

[palettes.sunset]
editor_background = "#2f1d2b"
editor_foreground = "#f7d9cf"
sidebar = "#281925"
activity_bar = "#21141f"
status_bar = "#d9534f"
title_bar = "#261722"
tab_active = "#2f1d2b"
tab_inactive = "#281925"
accent = "#ff6b5a"
accent_foreground = "#1a0f0d"
terminal = "#2b1a27"
border = "#503044"

[palettes.dusk]
editor_background = "#221a36"
editor_foreground = "#e0d6f2"
sidebar = "#1c162e"
activity_bar = "#171226"
status_bar = "#7a4fa3"
title_bar = "#1a142b"
tab_active = "#221a36"
tab_inactive = "#1c162e"
accent = "#b07cd8"
accent_foreground = "#ffffff"
terminal = "#1f1831"
border = "#3d3058"

[palettes.evening]
editor_background = "#151a33"
editor_foreground = "#d3d8f0"
sidebar = "#11162b"
activity_bar = "#0e1224"
status_bar = "#3d4f9f"
title_bar = "#10152a"
tab_active = "#151a33"
tab_inactive = "#11162b"
accent = "#6f86e8"
accent_foreground = "#ffffff"
terminal = "#13182f"
border = "#262e52"

[palettes.night]
editor_background = "#0e1329"
editor_foreground = "#ccd3f2"
sidebar = "#0b1022"
activity_bar = "#090d1c"
status_bar = "#222b5c"
title_bar = "#0a0f20"
tab_active = "#0e1329"
tab_inactive = "#0b1022"
accent = "#5e74d6"
accent_foreground = "#ffffff"
terminal = "#0c1125"
border = "#1d2448"
"##;
