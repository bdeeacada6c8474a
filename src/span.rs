// span.rs

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum GraphSpan {
    #[default]
    Main,
    OneHour,
    SixHours,
    OneDay,
    OneWeek,
    OneMonth,
    OneYear,
    All,
}

/// What to ask the graph renderer for, and which images to show afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanTarget {
    pub renderer_arg: &'static str,
    pub image_keys: &'static [&'static str],
}

const STACKED_KEYS: &[&str] = &["1h", "6h", "day", "week", "month", "year"];

/// Image keys the image endpoint will serve. The legends are drawn by the same renderer.
pub const IMAGE_KEYS: &[&str] = &[
    "main",
    "1h",
    "6h",
    "day",
    "week",
    "month",
    "year",
    "legend",
    "legend-full",
];

impl GraphSpan {
    /// Menu order.
    pub const ALL: [GraphSpan; 8] = [
        GraphSpan::Main,
        GraphSpan::OneHour,
        GraphSpan::SixHours,
        GraphSpan::OneDay,
        GraphSpan::OneWeek,
        GraphSpan::OneMonth,
        GraphSpan::OneYear,
        GraphSpan::All,
    ];

    /// Page ids outside the known set fall back to `Main`.
    pub fn from_page(page: Option<&str>) -> Self {
        page.and_then(|p| Self::ALL.into_iter().find(|s| s.id() == p))
            .unwrap_or_default()
    }

    pub fn id(self) -> &'static str {
        match self {
            GraphSpan::Main => "Main",
            GraphSpan::OneHour => "1 Hour",
            GraphSpan::SixHours => "6 Hours",
            GraphSpan::OneDay => "1 Day",
            GraphSpan::OneWeek => "1 Week",
            GraphSpan::OneMonth => "1 Month",
            GraphSpan::OneYear => "1 Year",
            GraphSpan::All => "All",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GraphSpan::Main => "Main",
            GraphSpan::OneHour => "Past Hour",
            GraphSpan::SixHours => "Past 6 Hours",
            GraphSpan::OneDay => "Past Day",
            GraphSpan::OneWeek => "Past Week",
            GraphSpan::OneMonth => "Past Month",
            GraphSpan::OneYear => "Past Year",
            GraphSpan::All => "All",
        }
    }

    pub fn target(self) -> SpanTarget {
        match self {
            GraphSpan::Main => SpanTarget::single("dayweek", &["main"]),
            GraphSpan::OneHour => SpanTarget::single("1h", &["1h"]),
            GraphSpan::SixHours => SpanTarget::single("6h", &["6h"]),
            GraphSpan::OneDay => SpanTarget::single("day", &["day"]),
            GraphSpan::OneWeek => SpanTarget::single("week", &["week"]),
            GraphSpan::OneMonth => SpanTarget::single("month", &["month"]),
            GraphSpan::OneYear => SpanTarget::single("year", &["year"]),
            GraphSpan::All => SpanTarget {
                renderer_arg: "all",
                image_keys: STACKED_KEYS,
            },
        }
    }
}

impl SpanTarget {
    const fn single(renderer_arg: &'static str, image_keys: &'static [&'static str; 1]) -> Self {
        SpanTarget {
            renderer_arg,
            image_keys,
        }
    }
}

pub fn resolve_span(page: Option<&str>) -> SpanTarget {
    GraphSpan::from_page(page).target()
}

pub fn is_image_key(key: &str) -> bool {
    IMAGE_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_table() {
        let cases = [
            ("Main", "dayweek", vec!["main"]),
            ("1 Hour", "1h", vec!["1h"]),
            ("6 Hours", "6h", vec!["6h"]),
            ("1 Day", "day", vec!["day"]),
            ("1 Week", "week", vec!["week"]),
            ("1 Month", "month", vec!["month"]),
            ("1 Year", "year", vec!["year"]),
            ("All", "all", vec!["1h", "6h", "day", "week", "month", "year"]),
        ];
        for (page, arg, keys) in cases {
            let t = resolve_span(Some(page));
            assert_eq!(t.renderer_arg, arg, "{page}");
            assert_eq!(t.image_keys.to_vec(), keys, "{page}");
        }
    }

    #[test]
    fn unknown_pages_are_main() {
        let main = resolve_span(Some("Main"));
        assert_eq!(resolve_span(None), main);
        for page in ["", "main", "2 Days", "1 hour", "All ", "<script>"] {
            assert_eq!(resolve_span(Some(page)), main, "{page:?}");
            assert_eq!(resolve_span(Some(page)), resolve_span(Some(page)));
        }
    }

    #[test]
    fn ids_round_trip_through_from_page() {
        for s in GraphSpan::ALL {
            assert_eq!(GraphSpan::from_page(Some(s.id())), s);
        }
    }

    #[test]
    fn every_target_image_is_servable() {
        for s in GraphSpan::ALL {
            assert!(s.target().image_keys.iter().all(|k| is_image_key(k)));
        }
        assert!(is_image_key("legend-full"));
        assert!(!is_image_key("../etc/passwd"));
    }
}

// EOF
