//! Chart payload: parallel series ready for a JSON charting front end.

use super::{check_finite, round2, Outcome, TransformError, Transformer};
use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub labels: Vec<String>,
    pub prices: Vec<f64>,
    pub volumes: Vec<u64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub opens: Vec<f64>,
}

impl ChartPayload {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn build(series: &PriceSeries) -> Result<ChartPayload, TransformError> {
    let n = series.len();
    let mut payload = ChartPayload {
        labels: Vec::with_capacity(n),
        prices: Vec::with_capacity(n),
        volumes: Vec::with_capacity(n),
        highs: Vec::with_capacity(n),
        lows: Vec::with_capacity(n),
        opens: Vec::with_capacity(n),
    };
    for bar in series.bars() {
        check_finite(bar)?;
        payload.labels.push(bar.date.format("%Y-%m-%d").to_string());
        payload.prices.push(round2(bar.close));
        payload.volumes.push(bar.volume);
        payload.highs.push(round2(bar.high));
        payload.lows.push(round2(bar.low));
        payload.opens.push(round2(bar.open));
    }
    Ok(payload)
}

impl Transformer {
    /// Build the chart payload. An empty series yields an empty payload.
    pub fn prepare_chart(&self, series: &PriceSeries) -> Outcome<ChartPayload> {
        self.settle("prepare_chart", None, build(series), ChartPayload::default)
    }
}
