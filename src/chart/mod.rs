//! Vitals chart adapter
//!
//! - **Series**: fixed key, label, color, unit and axis for each vital sign
//! - **Visibility**: which series are drawn
//! - **Axis**: auto-scaled primary domain, fixed O2 saturation domain
//! - **Adapter**: ordering, projection and gap-aware segments
//!
//! # Example
//!
//! ```rust
//! use ed_explorer::chart::{ChartOutcome, SeriesVisibility, VitalsChart};
//! use ed_explorer::model::{timestamp, VitalSign};
//!
//! let t = timestamp::parse("2180-07-23T14:00:00").unwrap();
//! let vitals = vec![VitalSign::at(t).heartrate(88.0).o2sat(97.0)];
//!
//! if let ChartOutcome::Ready(chart) = VitalsChart::build(&vitals) {
//!     let frame = chart.frame(&SeriesVisibility::default());
//!     assert_eq!(frame.slots, 1);
//! }
//! ```

mod adapter;
mod axis;
mod series;
mod visibility;

pub use adapter::{
    ChartFrame, ChartOutcome, ChartPoint, Segment, SeriesLine, VitalsChart, EMPTY_STATE_MESSAGE,
    FALLBACK_PRIMARY_DOMAIN,
};
pub use axis::{AxisDomain, Edge, O2_SAT_DOMAIN};
pub use series::{Axis, UnknownSeries, VitalSeries};
pub use visibility::{LegendEntry, SeriesVisibility};
