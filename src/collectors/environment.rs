//! Display and locale collectors: screen, color depth, timezone.

use crate::host::HostCapabilities;
use crate::signals::{format_js_number, UNDEFINED};

pub fn screen(host: &dyn HostCapabilities) -> String {
    let s = host.screen();
    format!(
        "{}x{}_{}x{}_{}",
        s.width, s.height, s.avail_width, s.avail_height, s.color_depth
    )
}

pub fn color_depth(host: &dyn HostCapabilities) -> String {
    let ratio = host
        .device_pixel_ratio()
        .filter(|r| *r != 0.0 && !r.is_nan())
        .unwrap_or(1.0);
    format!("{}_{}", host.screen().color_depth, format_js_number(ratio))
}

pub fn timezone(host: &dyn HostCapabilities) -> String {
    let tz = host.timezone();
    format!(
        "{}_{}",
        tz.name.as_deref().unwrap_or(UNDEFINED),
        tz.offset_minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ScreenInfo, StaticHost, TimezoneInfo};

    fn host_with_screen() -> StaticHost {
        StaticHost {
            screen: ScreenInfo {
                width: 2560,
                height: 1440,
                avail_width: 2560,
                avail_height: 1400,
                color_depth: 30,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_screen() {
        assert_eq!(screen(&host_with_screen()), "2560x1440_2560x1400_30");
    }

    #[test]
    fn test_color_depth_pixel_ratio() {
        let mut host = host_with_screen();
        assert_eq!(color_depth(&host), "30_1");
        host.device_pixel_ratio = Some(0.0);
        assert_eq!(color_depth(&host), "30_1");
        host.device_pixel_ratio = Some(1.25);
        assert_eq!(color_depth(&host), "30_1.25");
        host.device_pixel_ratio = Some(2.0);
        assert_eq!(color_depth(&host), "30_2");
    }

    #[test]
    fn test_timezone() {
        let host = StaticHost {
            timezone: TimezoneInfo {
                name: Some("Asia/Kolkata".into()),
                offset_minutes: -330,
            },
            ..Default::default()
        };
        assert_eq!(timezone(&host), "Asia/Kolkata_-330");
        // No resolved zone reads the way the JS template renders it
        assert_eq!(timezone(&StaticHost::default()), "undefined_0");
    }
}
