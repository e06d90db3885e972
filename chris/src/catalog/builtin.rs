//! The shipped tweak definitions, in display order

use super::{Subsystem, TweakDefinition};

const MAX_SPARSE: &str = "18.1.1";

fn gestalt(id: &str, name: &str, description: &str, key: &str) -> TweakDefinition {
    TweakDefinition::new(id, name, description, Subsystem::MobileGestalt, key)
}

fn status_bar(id: &str, name: &str, description: &str, key: &str) -> TweakDefinition {
    TweakDefinition::new(id, name, description, Subsystem::StatusBar, key)
        .with_category("Status Bar")
}

fn springboard(id: &str, name: &str, description: &str, key: &str) -> TweakDefinition {
    TweakDefinition::new(id, name, description, Subsystem::SpringBoard, key)
}

fn flag(id: &str, name: &str, description: &str, key: &str) -> TweakDefinition {
    TweakDefinition::new(id, name, description, Subsystem::FeatureFlag, key)
}

fn daemon(id: &str, name: &str, description: &str, bundle_id: &str) -> TweakDefinition {
    TweakDefinition::new(id, name, description, Subsystem::DaemonDisable, bundle_id)
        .with_category("Daemons")
}

pub(super) fn definitions() -> Vec<TweakDefinition> {
    let mut defs = Vec::with_capacity(110);
    defs.extend(mobilegestalt());
    defs.extend(status_bar_tweaks());
    defs.extend(springboard_tweaks());
    defs.extend(internal());
    defs.extend(daemons());
    defs.extend(feature_flags());
    defs
}

fn mobilegestalt() -> Vec<TweakDefinition> {
    vec![
        gestalt(
            "dynamic_island",
            "Dynamic Island on Any Device",
            "Enable Dynamic Island UI on non-DI devices.",
            "CwvKxM2iEFL9qfyGAEkL7A",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Device"),
        gestalt(
            "iphone_x_gestures",
            "iPhone X Gestures on SE",
            "Enable swipe gestures on SE models.",
            "YlEtTtHlNesRBOAn4OGEEw",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Device"),
        gestalt(
            "boot_chime",
            "Boot Chime",
            "Play the classic boot chime on startup.",
            "njBFMx7OAF6p7vDGABCGmg",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Audio"),
        gestalt(
            "charge_limit",
            "Charge Limit",
            "Enable the charge limit battery option.",
            "37kHRMBSBPAqtRiVJDxBuA",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Battery"),
        gestalt(
            "tap_to_wake",
            "Tap to Wake (SE)",
            "Enable tap-to-wake on unsupported SE devices.",
            "yZf3GTRMGTuwSV9oHFmKCg",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Device"),
        gestalt(
            "collision_sos",
            "Collision SOS",
            "Enable crash detection SOS feature.",
            "HCzWusHQwZDea6nNhaKndw",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Safety"),
        gestalt(
            "stage_manager",
            "Stage Manager",
            "Enable Stage Manager multitasking.",
            "qizCHB5GCbjsNMXRHhSAFw",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("UI"),
        gestalt(
            "no_parallax",
            "Disable Wallpaper Parallax",
            "Remove wallpaper parallax effect.",
            "UIParallaxCapability",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("UI"),
        gestalt(
            "region_restrictions",
            "Disable Region Restrictions",
            "Remove region-locked features like shutter sound.",
            "zHeENZu+wbg7JXItiWBMhQ",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Region"),
        gestalt(
            "pencil_settings",
            "Apple Pencil Settings",
            "Show Apple Pencil options in Settings.",
            "yhHcB0zwd7LAjHy3jPZtQg",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Settings"),
        gestalt(
            "action_button",
            "Action Button Settings",
            "Show Action Button settings page.",
            "cT44WE1EohiwRzhsHSEq+Q",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Settings"),
        gestalt(
            "camera_button_page",
            "Camera Button Settings (iPhone 16)",
            "Show Camera Control page in Settings.",
            "CwvKxM2iEFL9qfyGAEkL7B",
        )
        .with_ios_range("18.0", MAX_SPARSE)
        .with_category("Settings"),
        gestalt(
            "aod",
            "Always-on Display on Any Device",
            "Enable AOD on unsupported devices.",
            "2OOJf1VhaM7NxfRok3HbWQ",
        )
        .with_ios_range("18.0", MAX_SPARSE)
        .with_category("Display"),
        gestalt(
            "aod_vibrancy",
            "AOD Vibrancy",
            "Enable AOD vibrancy effects.",
            "kVQSBx+AkLCOkSHPo7EJeA",
        )
        .with_ios_range("18.0", MAX_SPARSE)
        .with_category("Display"),
        gestalt(
            "ai_enabler",
            "Apple Intelligence (AI Enabler)",
            "Enable Apple Intelligence on unsupported devices.",
            "A62OafQ85EJAiiqKn4agtg",
        )
        .with_ios_range("18.1", MAX_SPARSE)
        .with_category("AI"),
        gestalt(
            "solarium_fallback",
            "Force Solarium Fallback (Liquid Glass)",
            "Disable Liquid Glass effects (iOS 26+).",
            "SAGvsp6O6kAQ4fEfDJpC4Q",
        )
        .with_ios_min("26.0")
        .with_category("UI"),
        gestalt(
            "suppress_dynamic_island",
            "Suppress Dynamic Island",
            "Completely hide the Dynamic Island (iOS 26.2+).",
            "CwvKxM2iEFL9qfyGAEkL7C",
        )
        .with_ios_min("26.2")
        .with_category("Device")
        .exclusive(),
        gestalt(
            "iphone_air_subtype",
            "iPhone Air Dynamic Island Subtype",
            "Set the correct DI subtype for iPhone Air.",
            "AirDynamicIslandSubtype",
        )
        .with_ios_min("26.0")
        .with_category("Device"),
        gestalt(
            "hide_notch",
            "Hide Notch / TrueDepth Camera UI",
            "Remove the notch pill from the UI entirely.",
            "TrueDepthSensor",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("UI")
        .exclusive(),
        gestalt(
            "enable_pro_motion",
            "Force ProMotion 120Hz",
            "Force 120Hz ProMotion on non-Pro devices.",
            "ProMotionCapability",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Display")
        .exclusive(),
        gestalt(
            "pencil_pro_settings",
            "Apple Pencil Pro Settings",
            "Show Pencil Pro squeeze & barrel roll settings.",
            "PencilProCapability",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Settings")
        .exclusive(),
        gestalt(
            "always_on_camera",
            "Always-On Front Camera Indicator",
            "Always show the green camera dot when active.",
            "AlwaysOnCamera",
        )
        .with_category("Privacy")
        .exclusive(),
        gestalt(
            "enable_usb3",
            "Enable USB 3 Speed",
            "Force USB 3.0 speed on the Lightning/USB-C port.",
            "USBSuperSpeedCapability",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Hardware")
        .exclusive(),
        gestalt(
            "spatial_audio_all",
            "Spatial Audio on All Devices",
            "Enable Spatial Audio support on any device.",
            "SpatialAudioCapability",
        )
        .with_category("Audio")
        .exclusive(),
        gestalt(
            "satellite_sos",
            "Emergency SOS via Satellite",
            "Enable satellite SOS on unsupported devices.",
            "SatelliteSOSCapability",
        )
        .with_ios_range("17.0", MAX_SPARSE)
        .with_category("Safety")
        .exclusive(),
    ]
}

fn status_bar_tweaks() -> Vec<TweakDefinition> {
    vec![
        status_bar("carrier_name", "Carrier Name", "Override the carrier name text.", "CarrierName")
            .with_default(""),
        status_bar(
            "secondary_carrier",
            "Secondary Carrier Name",
            "Override the secondary carrier name.",
            "SecondaryCarrier",
        )
        .with_default(""),
        status_bar(
            "wifi_bars",
            "WiFi Bar Count",
            "Set number of WiFi signal bars (0–3).",
            "WiFiBars",
        )
        .with_default(0i64),
        status_bar(
            "cell_bars",
            "Cellular Bar Count",
            "Set number of cell signal bars (0–3).",
            "CellularBars",
        )
        .with_default(0i64),
        status_bar(
            "battery_capacity",
            "Battery Capacity",
            "Override displayed battery percentage.",
            "BatteryCapacity",
        )
        .with_default(0i64),
        status_bar("time_text", "Time Text", "Override the clock text.", "TimeText")
            .with_default(""),
        status_bar("date_text", "Date Text (iPad)", "Override the date text on iPads.", "DateText")
            .with_default(""),
        status_bar(
            "breadcrumb",
            "Breadcrumb Text",
            "Override the back-navigation breadcrumb.",
            "BreadcrumbText",
        )
        .with_default(""),
        status_bar(
            "hide_battery_icon",
            "Hide Battery Icon",
            "Remove battery icon from status bar.",
            "HideBattery",
        ),
        status_bar(
            "hide_wifi_icon",
            "Hide WiFi Icon",
            "Remove WiFi icon from status bar.",
            "HideWiFi",
        ),
        status_bar(
            "hide_cell_icon",
            "Hide Cellular Icon",
            "Remove cellular icon from status bar.",
            "HideCellular",
        ),
        status_bar(
            "numeric_strength",
            "Numeric Signal Strength",
            "Show dBm values instead of signal bars.",
            "NumericStrength",
        ),
        status_bar(
            "battery_detail",
            "Battery Display Detail",
            "Change how the battery is shown.",
            "BatteryDetail",
        )
        .with_default(0i64),
        status_bar("hide_time", "Hide Clock", "Remove clock from status bar entirely.", "HideTime")
            .exclusive(),
        status_bar(
            "hide_notif_count",
            "Hide Notification Count",
            "Remove notification badges from status bar.",
            "HideNotifCount",
        )
        .exclusive(),
        status_bar(
            "custom_battery_text",
            "Custom Battery Text",
            "Show custom text instead of battery %.",
            "CustomBatteryText",
        )
        .with_default("")
        .exclusive(),
        status_bar(
            "operator_logo",
            "Operator Logo",
            "Display a custom operator logo.",
            "OperatorLogo",
        )
        .with_default("")
        .exclusive(),
    ]
}

fn springboard_tweaks() -> Vec<TweakDefinition> {
    vec![
        springboard(
            "lock_footnote",
            "Lock Screen Footnote",
            "Add custom text below the lock screen.",
            "SBLockScreenFootnote",
        )
        .with_default("")
        .with_category("Lock Screen"),
        springboard(
            "auto_lock_time",
            "Auto-Lock Time",
            "Set the idle auto-lock time.",
            "SBLockScreenIdleTime",
        )
        .with_default(0i64)
        .with_category("Lock Screen"),
        springboard(
            "disable_lock_respring",
            "Disable Lock After Respring",
            "Stay unlocked after a respring.",
            "SBDisableLockAfterRespring",
        )
        .with_category("Lock Screen"),
        springboard(
            "no_dim_charging",
            "No Dimming While Charging",
            "Keep screen bright while charging.",
            "SBNoDimCharging",
        )
        .with_category("Display"),
        springboard(
            "no_low_batt_alert",
            "Disable Low Battery Alerts",
            "Silence low battery warnings.",
            "SBNoLowBatteryAlert",
        )
        .with_category("Battery"),
        springboard(
            "hide_ac_lock",
            "Hide AC Power on Lock Screen",
            "Remove charging indicator on lock screen.",
            "SBHideACPowerLockScreen",
        )
        .with_category("Lock Screen"),
        springboard(
            "supervision_text",
            "Supervision Text",
            "Show supervised device text on lock screen.",
            "SBSupervisionText",
        )
        .with_category("Lock Screen"),
        springboard(
            "di_screenshots",
            "Dynamic Island in Screenshots",
            "Include the DI area in screenshots.",
            "SBDynamicIslandScreenshots",
        )
        .with_category("Display"),
        springboard(
            "airplay_stage",
            "AirPlay + Stage Manager",
            "Enable AirPlay support for Stage Manager.",
            "SBAirPlayStageManager",
        )
        .with_category("Multitasking"),
        springboard(
            "auth_line",
            "Auth Line on Lock Screen",
            "Show red/green authentication status line.",
            "SBAuthLine",
        )
        .with_category("Lock Screen"),
        springboard(
            "no_float_tab_ipad",
            "Disable Floating Tab Bar (iPad)",
            "Pin the tab bar on iPads.",
            "SBNoFloatingTabBar",
        )
        .with_category("UI"),
        springboard(
            "airdrop_limit",
            "Disable AirDrop Time Limit",
            "Remove the AirDrop 'share to everyone' timer.",
            "SBAirDropTimeLimit",
        )
        .with_category("Connectivity"),
        springboard(
            "custom_wallpaper_blur",
            "Custom Wallpaper Blur Level",
            "Adjust wallpaper blur intensity (0–100).",
            "SBWallpaperBlurLevel",
        )
        .with_default(0i64)
        .with_category("Display")
        .exclusive(),
        springboard("hide_dock", "Hide Dock", "Make the dock completely invisible.", "SBHideDock")
            .with_category("UI").exclusive(),
        springboard(
            "hide_home_bar",
            "Hide Home Bar",
            "Remove the home indicator bar.",
            "SBHideHomeBar",
        )
        .with_category("UI")
        .exclusive(),
        springboard(
            "icon_label_hide",
            "Hide App Icon Labels",
            "Remove text labels below app icons.",
            "SBHideIconLabels",
        )
        .with_category("UI")
        .exclusive(),
        springboard(
            "custom_shutdown_msg",
            "Custom Shutdown Message",
            "Show custom text on the shutdown slider.",
            "SBShutdownMessage",
        )
        .with_default("")
        .with_category("Lock Screen")
        .exclusive(),
        springboard(
            "persistent_wifi",
            "Never Drop WiFi on Sleep",
            "Keep WiFi active when the screen is off.",
            "SBPersistentWiFi",
        )
        .with_category("Connectivity")
        .exclusive(),
        springboard(
            "notification_grouping",
            "Force Notification Grouping",
            "Always group notifications by app.",
            "SBForceNotifGrouping",
        )
        .with_category("Notifications")
        .exclusive(),
    ]
}

fn internal() -> Vec<TweakDefinition> {
    vec![
        flag(
            "build_in_statusbar",
            "Build Version in Status Bar",
            "Show iOS build string in status bar.",
            "InternalBuild",
        )
        .with_category("Debug"),
        flag(
            "rtl_force",
            "Force Right to Left Layout",
            "Force RTL UI direction.",
            "NSForceRightToLeftWriting",
        )
        .with_category("Debug"),
        flag(
            "hidden_home_icons",
            "Show Hidden Home Screen Icons",
            "Reveal internal app icons.",
            "SBShowDebugIcons",
        )
        .with_category("Debug"),
        flag(
            "metal_hud",
            "Force Metal HUD Debug",
            "Show the Metal GPU performance HUD.",
            "MetalForceHUDEnabled",
        )
        .with_category("Debug"),
        flag(
            "imessage_diag",
            "iMessage Diagnostics",
            "Enable iMessage diagnostics mode.",
            "iMessageDiag",
        )
        .with_category("Debug"),
        flag("ids_diag", "IDS Diagnostics", "Enable IDS diagnostics mode.", "IDSDiag")
            .with_category("Debug"),
        flag("vc_diag", "VC Diagnostics", "Enable FaceTime VC diagnostics.", "VCDiag")
            .with_category("Debug"),
        flag(
            "appstore_debug",
            "App Store Debug Gesture",
            "Enable hidden App Store debug gesture.",
            "AppStoreDebugGesture",
        )
        .with_category("Debug"),
        flag("notes_debug", "Notes Debug Mode", "Enable Notes app debug logging.", "NotesDebugMode")
            .with_category("Debug"),
        flag(
            "show_touches",
            "Show Touches with Debug Info",
            "Draw touch indicators with coordinates.",
            "ShowTouchesDebug",
        )
        .with_category("Debug"),
        flag(
            "hide_respring_icon",
            "Hide Respring Icon",
            "Remove the respring icon from springboard.",
            "HideRespringIcon",
        )
        .with_category("UI"),
        flag(
            "paste_sound",
            "Play Sound on Paste",
            "Play a chime when content is pasted.",
            "PlaySoundOnPaste",
        )
        .with_category("Audio"),
        flag(
            "system_paste_notif",
            "System Paste Notifications",
            "Show notification for system-level pastes.",
            "SystemPasteNotif",
        )
        .with_category("Privacy"),
        flag(
            "key_flick",
            "iPad Keyboard on iPhone",
            "Enable iPad-style key flick input on iPhones.",
            "KeyFlickInput",
        )
        .with_ios_range("17.0", "26.0")
        .with_category("Input"),
        flag(
            "ignore_build_check",
            "Ignore Liquid Glass Build Check",
            "Skip app compatibility check for Liquid Glass.",
            "IgnoreSolariumBuildCheck",
        )
        .with_ios_min("26.0")
        .with_category("UI"),
        flag(
            "ui_animation_speed",
            "UI Animation Speed Multiplier",
            "Speed up or slow down all UI animations.",
            "UIAnimationSpeed",
        )
        .with_default(0i64)
        .with_category("UI")
        .exclusive(),
        flag(
            "expose_private_api",
            "Expose Private APIs in AppStore",
            "Show private framework info in App Store.",
            "ExposePrivateAPI",
        )
        .with_category("Debug")
        .exclusive(),
        flag(
            "force_dark_mode",
            "Force System-Wide Dark Mode",
            "Lock the system into dark mode globally.",
            "ForceDarkMode",
        )
        .with_category("UI")
        .exclusive(),
        flag(
            "log_all_network",
            "Log All Network Requests",
            "Enable full network request logging.",
            "LogNetworkRequests",
        )
        .with_category("Debug")
        .exclusive()
        .risky(),
    ]
}

fn daemons() -> Vec<TweakDefinition> {
    vec![
        daemon(
            "kill_otad",
            "Disable OTA Updates (OTAd)",
            "Stop automatic iOS update downloads.",
            "com.apple.mobile.softwareupdated",
        ),
        daemon(
            "kill_usagetracking",
            "Disable Usage Tracking",
            "Stop Apple's usage analytics daemon.",
            "com.apple.UsageTrackingAgent",
        ),
        daemon(
            "kill_gamecenter",
            "Disable Game Center",
            "Fully disable Game Center services.",
            "com.apple.gamed",
        ),
        daemon(
            "kill_screentime",
            "Disable Screen Time Agent",
            "Stop Screen Time monitoring daemon.",
            "com.apple.ScreenTimeAgent",
        ),
        daemon(
            "kill_logs",
            "Disable Logs, Dumps & Crashes",
            "Stop crash reporter and log daemons.",
            "com.apple.CrashReporter",
        ),
        daemon(
            "kill_atwakeup",
            "Disable ATWAKEUP",
            "Stop the AT wakeup background daemon.",
            "com.apple.ATWakeup",
        ),
        daemon(
            "kill_tipsd",
            "Disable Tips Daemon",
            "Stop the Tips app suggestions daemon.",
            "com.apple.tipsd",
        ),
        daemon(
            "kill_vpn",
            "Disable VPN Daemon",
            "Stop the built-in VPN services daemon.",
            "com.apple.vpnd",
        ),
        daemon(
            "kill_chinesewlan",
            "Disable Chinese WLAN Service",
            "Stop China-region WLAN telemetry daemon.",
            "com.apple.wifid.china",
        ),
        daemon(
            "kill_healthkit",
            "Disable HealthKit",
            "Stop HealthKit background daemon.",
            "com.apple.healthd",
        ),
        daemon(
            "kill_airprint",
            "Disable AirPrint",
            "Stop AirPrint discovery daemon.",
            "com.apple.printd",
        ),
        daemon(
            "kill_assistivetouch",
            "Disable Assistive Touch Daemon",
            "Stop AssistiveTouch background services.",
            "com.apple.assistivetouchd",
        ),
        daemon(
            "kill_icloud",
            "Disable iCloud Daemon",
            "Stop iCloud background sync daemon.",
            "com.apple.cloudd",
        ),
        daemon(
            "kill_hotspot",
            "Disable Personal Hotspot",
            "Stop internet tethering daemon.",
            "com.apple.InternetTethering",
        ),
        daemon(
            "kill_passbook",
            "Disable Passbook / Wallet",
            "Stop Wallet/Passbook background daemon.",
            "com.apple.passd",
        ),
        daemon(
            "kill_spotlight",
            "Disable Spotlight",
            "Stop Spotlight indexing daemon.",
            "com.apple.spotlightd",
        ),
        daemon(
            "kill_voicecontrol",
            "Disable Voice Control",
            "Stop Voice Control services.",
            "com.apple.voicecontrol",
        ),
        daemon(
            "kill_thermalmonitord",
            "Disable Thermal Monitor",
            "Stop thermal throttling daemon. DANGEROUS.",
            "com.apple.thermalmonitord",
        )
        .risky(),
        daemon(
            "kill_locationd",
            "Disable Location Services",
            "Stop locationd, which kills GPS for all apps.",
            "com.apple.locationd",
        )
        .exclusive()
        .risky(),
        daemon(
            "kill_siri",
            "Disable Siri Daemon",
            "Stop all Siri background services.",
            "com.apple.siri",
        )
        .exclusive(),
        daemon(
            "kill_maps",
            "Disable Maps Background",
            "Stop Maps background update daemon.",
            "com.apple.mapsd",
        )
        .exclusive(),
        daemon(
            "kill_fmf",
            "Disable Find My Friends",
            "Stop Find My Friends location sharing.",
            "com.apple.followup",
        )
        .exclusive(),
        daemon(
            "kill_biometrickitd",
            "Disable Biometric Kit Daemon",
            "Stop Touch/Face ID background services.",
            "com.apple.biometrickitd",
        )
        .exclusive()
        .risky(),
        daemon(
            "kill_suggestions",
            "Disable Siri Suggestions",
            "Stop Siri proactive suggestion daemon.",
            "com.apple.suggestions",
        )
        .exclusive(),
        daemon(
            "kill_adservices",
            "Disable Ad Services",
            "Stop Apple advertising attribution daemon.",
            "com.apple.adservicesd",
        )
        .exclusive(),
        daemon(
            "kill_bluetooth",
            "Disable Bluetooth Daemon",
            "Stop Bluetooth background daemon entirely.",
            "com.apple.bluetoothd",
        )
        .exclusive()
        .risky(),
    ]
}

// Only present between 18.0 and the 18.1 betas
fn feature_flags() -> Vec<TweakDefinition> {
    vec![
        flag(
            "lockscreen_clock_anim",
            "Lock Screen Clock Animation",
            "Animated clock on the lock screen.",
            "LockScreenClockAnimation",
        )
        .with_ios_range("18.0", MAX_SPARSE)
        .with_category("Lock Screen"),
        flag(
            "lockscreen_dupe_btn",
            "Lock Screen Page Duplicate Btn",
            "Enable page duplication on lock screen.",
            "LockScreenPageDuplication",
        )
        .with_ios_range("18.0", MAX_SPARSE)
        .with_category("Lock Screen"),
        flag(
            "old_photos_ui",
            "Restore Old Photos UI",
            "Disable the new iOS 18 Photos redesign.",
            "DisablePhotosRedesign",
        )
        .with_ios_range("18.0", "18.0.1")
        .with_category("Apps"),
    ]
}
