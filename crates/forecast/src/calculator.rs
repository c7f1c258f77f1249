use crate::{EffectiveInputs, ForecastError, MonthlyBreakdown};

/// Output of the flat run-rate projection, before provenance is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub monthly_spend: f64,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub roi_pct: f64,
    pub estimated_cpc: f64,
    pub estimated_cpm: f64,
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
}

/// Project spend, revenue, ROI and CPM over `campaign_months` at a constant
/// monthly run-rate. No seasonality and no compounding.
pub fn compute_forecast(
    inputs: EffectiveInputs,
    campaign_months: u32,
    target_roas: f64,
) -> Result<Forecast, ForecastError> {
    let monthly_spend = inputs.monthly_clicks * inputs.cpc;
    let total_spend = monthly_spend * f64::from(campaign_months);
    let total_revenue = total_spend * target_roas;

    if total_spend == 0.0 || !total_spend.is_finite() {
        return Err(ForecastError::Internal(format!(
            "total spend must be positive and finite, got {total_spend}"
        )));
    }
    let roi_pct = (total_revenue - total_spend) / total_spend * 100.0;
    if !roi_pct.is_finite() {
        return Err(ForecastError::Internal(format!(
            "roi is not finite for spend {total_spend} and revenue {total_revenue}"
        )));
    }

    let clicks = if inputs.monthly_clicks == 0.0 {
        1.0
    } else {
        inputs.monthly_clicks
    };
    let estimated_cpm = inputs.cpc * 1000.0 / clicks;

    let monthly_revenue = monthly_spend * target_roas;
    let monthly_breakdown = (1..=campaign_months)
        .map(|month| MonthlyBreakdown {
            month,
            spend: monthly_spend,
            revenue: monthly_revenue,
        })
        .collect();

    Ok(Forecast {
        monthly_spend,
        total_spend,
        total_revenue,
        roi_pct,
        estimated_cpc: inputs.cpc,
        estimated_cpm,
        monthly_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(cpc: f64, monthly_clicks: f64) -> EffectiveInputs {
        EffectiveInputs {
            cpc,
            monthly_clicks,
        }
    }

    #[test]
    fn flat_run_rate_projection() {
        let forecast = compute_forecast(inputs(2.0, 500.0), 3, 4.0).unwrap();
        assert_eq!(forecast.monthly_spend, 1000.0);
        assert_eq!(forecast.total_spend, 3000.0);
        assert_eq!(forecast.total_revenue, 12000.0);
        assert_eq!(forecast.roi_pct, 300.0);
        assert_eq!(forecast.estimated_cpc, 2.0);
        assert_eq!(forecast.estimated_cpm, 4.0);

        let months: Vec<u32> = forecast.monthly_breakdown.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![1, 2, 3]);
        for entry in &forecast.monthly_breakdown {
            assert_eq!(entry.spend, 1000.0);
            assert_eq!(entry.revenue, 4000.0);
        }
    }

    #[test]
    fn roi_depends_only_on_roas() {
        for (cpc, clicks, months, roas) in [
            (0.35, 1234.0, 1, 1.0),
            (7.2, 18.0, 12, 0.5),
            (1.5, 800.0, 5, 2.75),
        ] {
            let forecast = compute_forecast(inputs(cpc, clicks), months, roas).unwrap();
            assert!(
                (forecast.roi_pct - (roas - 1.0) * 100.0).abs() < 1e-9,
                "roas {roas}: {}",
                forecast.roi_pct
            );
        }
    }

    #[test]
    fn zero_spend_is_internal_error() {
        let err = compute_forecast(inputs(0.0, 500.0), 3, 4.0).unwrap_err();
        assert!(matches!(err, ForecastError::Internal(_)));
        assert!(compute_forecast(inputs(2.0, 500.0), 0, 4.0).is_err());
    }

    #[test]
    fn overflowing_spend_is_internal_error() {
        let err = compute_forecast(inputs(f64::MAX, f64::MAX), 2, 1.0).unwrap_err();
        assert!(matches!(err, ForecastError::Internal(_)));
    }
}
