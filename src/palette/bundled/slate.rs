//! Slate - High-contrast slate greys with a steady blue accent

pub const PACK: &str = r##"# Slate style pack for suntint
# High-contrast slate greys with a steady blue accent

[meta]
name = "Slate"
version = 1

[palettes.midnight]
editor_background = "#0a0c10"
editor_foreground = "#f0f3f6"
sidebar = "#06080b"
activity_bar = "#040507"
status_bar = "#1c2430"
title_bar = "#05070a"
tab_active = "#0a0c10"
tab_inactive = "#06080b"
accent = "#58a6ff"
accent_foreground = "#0a0c10"
terminal = "#080a0d"
border = "#3d4654"

[palettes.deep_night]
editor_background = "#0b0d12"
editor_foreground = "#eef1f5"
sidebar = "#07090c"
activity_bar = "#050608"
status_bar = "#1e2633"
title_bar = "#06080b"
tab_active = "#0b0d12"
tab_inactive = "#07090c"
accent = "#5aa2f8"
accent_foreground = "#0a0c10"
terminal = "#090b0f"
border = "#3f4857"

[palettes.pre_dawn]
editor_background = "#10141b"
editor_foreground = "#edf0f4"
sidebar = "#0b0e13"
activity_bar = "#080a0e"
status_bar = "#26303f"
title_bar = "#0a0d12"
tab_active = "#10141b"
tab_inactive = "#0b0e13"
accent = "#79b8ff"
accent_foreground = "#0a0c10"
terminal = "#0e1118"
border = "#465163"

[palettes.dawn]
editor_background = "#161c26"
editor_foreground = "#f2f4f7"
sidebar = "#11161e"
activity_bar = "#0d1118"
status_bar = "#33425a"
title_bar = "#10141c"
tab_active = "#161c26"
tab_inactive = "#11161e"
accent = "#8cc4ff"
accent_foreground = "#0a0c10"
terminal = "#141923"
border = "#4f5d73"

[palettes.sunrise]
editor_background = "#1d2430"
editor_foreground = "#f6f8fa"
sidebar = "#171d27"
activity_bar = "#121720"
status_bar = "#2f6fb3"
title_bar = "#161b25"
tab_active = "#1d2430"
tab_inactive = "#171d27"
accent = "#9ecbff"
accent_foreground = "#0a0c10"
terminal = "#1a212c"
border = "#5a6980"

[palettes.morning]
editor_background = "#ffffff"
editor_foreground = "#0d1117"
sidebar = "#f0f2f5"
activity_bar = "#e4e8ee"
status_bar = "#0b5cad"
title_bar = "#eef1f4"
tab_active = "#ffffff"
tab_inactive = "#e9edf1"
accent = "#0550ae"
accent_foreground = "#ffffff"
terminal = "#f9fafb"
border = "#afb8c1"

[palettes.midday]
editor_background = "#ffffff"
editor_foreground = "#010409"
sidebar = "#f3f5f7"
activity_bar = "#e7eaee"
status_bar = "#0349b4"
title_bar = "#f1f3f5"
tab_active = "#ffffff"
tab_inactive = "#eceff2"
accent = "#0349b4"
accent_foreground = "#ffffff"
terminal = "#fafbfc"
border = "#8c959f"

[palettes.afternoon]
editor_background = "#fcfcfd"
editor_foreground = "#0d1117"
sidebar = "#eff1f4"
activity_bar = "#e2e6eb"
status_bar = "#1b61c9"
title_bar = "#eceff2"
tab_active = "#fcfcfd"
tab_inactive = "#e7ebef"
accent = "#0a58ca"
accent_foreground = "#ffffff"
terminal = "#f7f8fa"
border = "#a4adb8"

[palettes.golden_hour]
editor_background = "#1f2631"
editor_foreground = "#f6f8fa"
sidebar = "#19202a"
activity_bar = "#141a22"
status_bar = "#2563c4"
title_bar = "#181e28"
tab_active = "#1f2631"
tab_inactive = "#19202a"
accent = "#a5d0ff"
accent_foreground = "#0a0c10"
terminal = "#1c232e"
border = "#5c6b82"

[palettes.sunset]
editor_background = "#1a202a"
editor_foreground = "#f3f5f8"
sidebar = "#151a23"
activity_bar = "#10151c"
status_bar = "#294f8a"
title_bar = "#141922"
tab_active = "#1a202a"
tab_inactive = "#151a23"
accent = "#93c1fb"
accent_foreground = "#0a0c10"
terminal = "#171d27"
border = "#54627a"

[palettes.dusk]
editor_background = "#141922"
editor_foreground = "#eff2f6"
sidebar = "#10141b"
activity_bar = "#0c1015"
status_bar = "#223248"
title_bar = "#0f131a"
tab_active = "#141922"
tab_inactive = "#10141b"
accent = "#7fb6f7"
accent_foreground = "#0a0c10"
terminal = "#12161f"
border = "#4a566a"

[palettes.evening]
editor_background = "#0f131a"
editor_foreground = "#eef1f5"
sidebar = "#0b0e14"
activity_bar = "#080b0f"
status_bar = "#1e2938"
title_bar = "#0a0d13"
tab_active = "#0f131a"
tab_inactive = "#0b0e14"
accent = "#68abf9"
accent_foreground = "#0a0c10"
terminal = "#0d1117"
border = "#424d5e"

[palettes.night]
editor_background = "#0b0e13"
editor_foreground = "#eff2f6"
sidebar = "#080a0e"
activity_bar = "#05070a"
status_bar = "#1d2531"
title_bar = "#07090d"
tab_active = "#0b0e13"
tab_inactive = "#080a0e"
accent = "#5fa8fc"
accent_foreground = "#0a0c10"
terminal = "#090c10"
border = "#3e4756"
"##;
