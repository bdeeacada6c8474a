// view.rs
//
// Everything the dashboard page shows, computed from one request. No markup here.

use chrono::NaiveDateTime;
use tracing::*;

use crate::{
    DashResult, GraphSpan, SensorReading, Settings, Setpoints, SpanTarget, TS_FORMAT, User,
    celsius_to_fahrenheit,
};

#[derive(Clone, Debug, Default)]
pub struct DashQuery {
    pub page: Option<String>,
    pub r: Option<String>,
}

impl DashQuery {
    /// Repeated keys do not fail the request, the last one wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = DashQuery::default();
        for (k, v) in pairs {
            match k.as_str() {
                "page" => q.page = Some(v),
                "r" => q.r = Some(v),
                _ => {}
            }
        }
        q
    }
}

/// The only inputs a dashboard render depends on.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub page: GraphSpan,
    pub refresh: bool,
    pub user: User,
}

impl RequestContext {
    pub fn new(query: &DashQuery, user: User) -> Self {
        RequestContext {
            page: GraphSpan::from_page(query.page.as_deref()),
            refresh: query.r.as_deref() == Some("1"),
            user,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuItem {
    pub id: &'static str,
    pub title: &'static str,
    pub active: bool,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub page: GraphSpan,
    pub refresh: bool,
    pub menu: Vec<MenuItem>,
    /// Same page with the refresh flag flipped.
    pub refresh_toggle: String,
}

pub fn page_href(span: GraphSpan, refresh: bool) -> String {
    let page = span.id().replace(' ', "%20");
    if refresh {
        format!("/?r=1&page={page}")
    } else {
        format!("/?page={page}")
    }
}

pub fn image_href(key: &str) -> String {
    format!("/image?span={key}")
}

impl ViewState {
    pub fn new(ctx: &RequestContext) -> Self {
        let menu = GraphSpan::ALL
            .into_iter()
            .map(|s| MenuItem {
                id: s.id(),
                title: s.title(),
                active: s == ctx.page,
                href: page_href(s, ctx.refresh),
            })
            .collect();

        ViewState {
            page: ctx.page,
            refresh: ctx.refresh,
            menu,
            refresh_toggle: page_href(ctx.page, !ctx.refresh),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dual {
    pub c: f64,
    pub f: f64,
}

impl Dual {
    pub fn from_celsius(c: f64) -> Self {
        Dual {
            c,
            f: celsius_to_fahrenheit(c),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureBlock {
    pub now: Option<Dual>,
    pub set: Option<Dual>,
    pub pid_on: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HumidityBlock {
    pub now: Option<f64>,
    pub set: Option<f64>,
    pub pid_on: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DewPointBlock {
    pub now: Option<Dual>,
}

#[derive(Clone, Debug)]
pub struct DashboardView {
    pub title: String,
    /// Auto-refresh interval, shown whether or not it is switched on.
    pub refresh_secs: u32,
    pub now: String,
    pub last_read: Option<String>,
    pub temperature: TemperatureBlock,
    pub humidity: HumidityBlock,
    pub dewpoint: DewPointBlock,
    pub state: ViewState,
    pub target: SpanTarget,
    pub images: Vec<String>,
    pub user: User,
    pub sensor_error: Option<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct Presenter {
    pub refresh_secs: u32,
}

impl Presenter {
    /// Unreadable settings fail the whole page. A bad sensor log only empties the sensor values.
    pub fn build(
        &self,
        ctx: &RequestContext,
        settings: DashResult<Settings>,
        reading: DashResult<SensorReading>,
        now: NaiveDateTime,
    ) -> DashResult<DashboardView> {
        let setpoints: Setpoints = settings?.setpoints();

        let (reading, sensor_error) = match reading {
            Ok(r) => (Some(r), None),
            Err(e) => {
                warn!("No sensor data: {e}");
                (None, Some(e.to_string()))
            }
        };

        let state = ViewState::new(ctx);
        let target = ctx.page.target();

        Ok(DashboardView {
            title: format!("Mycodo - {}", ctx.page.id()),
            refresh_secs: self.refresh_secs,
            now: now.format(TS_FORMAT).to_string(),
            last_read: reading
                .as_ref()
                .map(|r| r.timestamp.format(TS_FORMAT).to_string()),
            temperature: TemperatureBlock {
                now: reading.as_ref().map(|r| Dual::from_celsius(r.temp_c)),
                set: setpoints.settemp.map(Dual::from_celsius),
                pid_on: !setpoints.temp_pid_disabled,
            },
            humidity: HumidityBlock {
                now: reading.as_ref().map(|r| r.humidity),
                set: setpoints.sethum,
                pid_on: !setpoints.hum_pid_disabled,
            },
            dewpoint: DewPointBlock {
                now: reading.as_ref().map(|r| Dual::from_celsius(r.dewpoint_c)),
            },
            state,
            target,
            images: target.image_keys.iter().map(|k| image_href(k)).collect(),
            user: ctx.user.clone(),
            sensor_error,
        })
    }
}


// EOF
