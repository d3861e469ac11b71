use serde::Serialize;

use super::dates::{bucket_dates, labels, BucketDates};
use super::palette::ColorPair;
use crate::request::WidgetRequest;

/// Y-axis rendering hint, serialized as `{"type": ..., "value"?: ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisFormatter {
    TimeDuration,
    /// Suffix such as `commits` appended after the number.
    AppendUnit(&'static str),
    /// Free text shown next to the axis value.
    AppendText(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: String,
    pub y: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: String,
    pub data: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_formatter: Option<AxisFormatter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_color_scheme: Option<ColorPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_color_scheme: Option<ColorPair>,
    pub bucket_dates: Vec<BucketDates>,
}

/// One series before labelling: an id and one y value per bucket.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub id: &'static str,
    pub values: Vec<i64>,
    pub y_axis_formatter: Option<AxisFormatter>,
    pub colors: Option<(ColorPair, ColorPair)>,
}

impl SeriesSpec {
    pub fn new(id: &'static str, values: Vec<i64>) -> Self {
        Self {
            id,
            values,
            y_axis_formatter: None,
            colors: None,
        }
    }

    pub fn time_duration(self) -> Self {
        self.formatter(AxisFormatter::TimeDuration)
    }

    pub fn formatter(mut self, formatter: AxisFormatter) -> Self {
        self.y_axis_formatter = Some(formatter);
        self
    }

    /// `(light, dark)` colour pair.
    pub fn colors(mut self, light: ColorPair, dark: ColorPair) -> Self {
        self.colors = Some((light, dark));
        self
    }
}

/// Label every spec over the same bucket keys. Values missing at the tail of a
/// spec are back-filled with zero so all series share one x axis.
pub fn assemble(request: &WidgetRequest, keys: &[i64], specs: Vec<SeriesSpec>) -> Vec<Series> {
    let xs = labels(request, keys);
    let dates = bucket_dates(request, keys);

    specs
        .into_iter()
        .map(|spec| Series {
            id: spec.id.to_string(),
            data: xs
                .iter()
                .enumerate()
                .map(|(i, x)| Point {
                    x: x.clone(),
                    y: spec.values.get(i).copied().unwrap_or(0),
                })
                .collect(),
            y_axis_formatter: spec.y_axis_formatter,
            light_color_scheme: spec.colors.map(|(l, _)| l),
            dark_color_scheme: spec.colors.map(|(_, d)| d),
            bucket_dates: dates.clone(),
        })
        .collect()
}
