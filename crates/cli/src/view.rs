use gtb_core::dashboard::Dashboard;
use gtb_core::domain::growth::{projection, ContributionPlan};
use gtb_core::domain::portfolio::{allocation_total, sector_hue, SECTORS};
use gtb_core::storage::KeyValueStore;

const TITLE: &str = "Global Titan Blend Index (GTB)";

pub fn login_prompt() -> String {
    "Login to GTB Simulator\n  pass --email and --password (or set GTB_EMAIL and GTB_PASSWORD)\n"
        .to_string()
}

pub fn allocation() -> String {
    let mut out = String::from("Portfolio Allocation\n");
    for (idx, sector) in SECTORS.iter().enumerate() {
        out.push_str(&format!(
            "  {:<10} {:>5.1}%  hsl({}, 70%, 60%)\n",
            sector.label,
            sector.percentage,
            sector_hue(idx)
        ));
    }
    out.push_str(&format!("  {:<10} {:>5.1}%\n", "Total", allocation_total(&SECTORS)));
    out
}

pub fn prices<K: KeyValueStore>(dashboard: &Dashboard<K>) -> String {
    let mut out = String::from("Real-Time Prices Snapshot");
    match dashboard.prices() {
        Some(snapshot) => {
            out.push_str(&format!(
                " (as of {})\n",
                snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            for (ticker, price) in &snapshot.prices {
                out.push_str(&format!("  {ticker}: ${}\n", money(*price)));
            }
        }
        None => out.push('\n'),
    }

    let yield_pct = dashboard.dividend_yield() * 100.0;
    out.push_str(&format!(
        "Estimated Portfolio Value: ${:.2}\n",
        dashboard.portfolio_value()
    ));
    out.push_str(&format!(
        "Projected Annual Dividend Income (@{yield_pct:.1}%): ${:.2}\n",
        dashboard.estimated_income()
    ));
    out
}

/// Both curves side by side; the active plan's column is starred.
pub fn growth_table(active: Option<ContributionPlan>) -> String {
    let mut out = String::from("Simulated Growth\n");
    out.push_str(&format!("  {:<9}", "Month"));
    for plan in ContributionPlan::ALL {
        let marker = if Some(plan) == active { "*" } else { " " };
        out.push_str(&format!(" {:>12}{marker}", plan.to_string()));
    }
    out.push('\n');

    for point in projection() {
        out.push_str(&format!("  {:<9}", point.label));
        for plan in ContributionPlan::ALL {
            out.push_str(&format!(" {:>12.2} ", point.value(plan)));
        }
        out.push('\n');
    }
    out
}

/// Only the selected plan's curve; blank when the stored plan is unknown.
pub fn growth_curve<K: KeyValueStore>(dashboard: &Dashboard<K>) -> String {
    let mut out = String::from("Simulated Growth");
    match dashboard.active_curve() {
        Some((plan, points)) => {
            out.push_str(&format!(" ({plan})\n"));
            for point in points {
                out.push_str(&format!("  {:<9} {:>12.2}\n", point.label, point.value(plan)));
            }
        }
        None => {
            let label = dashboard
                .preferences()
                .contribution_label()
                .unwrap_or("<none>");
            out.push_str(&format!("\n  no curve for contribution {label:?}\n"));
        }
    }
    out
}

pub fn dashboard<K: KeyValueStore>(dashboard: &Dashboard<K>) -> String {
    let mut out = format!("{TITLE}\n\n");
    out.push_str(&allocation());
    out.push('\n');
    out.push_str(&prices(dashboard));
    out.push('\n');
    out.push_str(&growth_curve(dashboard));
    out
}

fn money(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("{p:.2}"),
        None => "undefined".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtb_core::domain::portfolio::Quote;
    use gtb_core::quotes::QuoteProvider;
    use gtb_core::storage::memory::MemoryStore;

    struct OnePrice;

    #[async_trait::async_trait]
    impl QuoteProvider for OnePrice {
        fn provider_name(&self) -> &'static str {
            "one"
        }

        async fn fetch_quote(&self, ticker: &str) -> anyhow::Result<Option<Quote>> {
            let price = (ticker == "AAPL").then_some(100.0);
            Ok(Some(Quote {
                ticker: ticker.to_string(),
                price,
            }))
        }
    }

    fn open() -> Dashboard<MemoryStore> {
        let mut dashboard = Dashboard::open(MemoryStore::new(), 0.018);
        dashboard.login("a@b.c", "pw").unwrap();
        dashboard
    }

    #[test]
    fn allocation_lists_every_sector_and_raw_total() {
        let text = allocation();
        assert!(text.contains("Tech"));
        assert!(text.contains("17.5%"));
        assert!(text.contains("hsl(315, 70%, 60%)"));
        assert!(text.contains("Total"));
        assert!(text.contains("97.5%"));
    }

    #[tokio::test]
    async fn prices_render_missing_as_undefined() {
        let mut dashboard = open();
        dashboard.refresh_prices(&OnePrice, &["AAPL", "RIO"]).await;

        let text = prices(&dashboard);
        assert!(text.contains("AAPL: $100.00"));
        assert!(text.contains("RIO: $undefined"));
        assert!(text.contains("Estimated Portfolio Value: $100.00"));
        assert!(text.contains("(@1.8%): $1.80"));
    }

    #[test]
    fn prices_before_fetch_are_zero() {
        let text = prices(&open());
        assert!(text.contains("Estimated Portfolio Value: $0.00"));
        assert!(text.contains("$0.00\n"));
    }

    #[test]
    fn growth_table_marks_active_plan() {
        let text = growth_table(Some(ContributionPlan::Monthly1000));
        assert!(text.contains("$1000/mo*"));
        assert!(text.contains("$500/mo "));
        assert!(text.contains("Month 12"));
        assert!(text.contains("1515.00"));
        assert!(text.contains("3030.00"));
    }

    #[test]
    fn growth_curve_shows_only_selected_plan() {
        let mut dashboard = open();
        dashboard.select_plan(ContributionPlan::Monthly1000).unwrap();
        let text = growth_curve(&dashboard);
        assert!(text.contains("($1000/mo)"));
        assert!(text.contains("3030.00"));
        assert!(!text.contains("1515.00"));
    }

    #[test]
    fn growth_curve_blank_for_unknown_plan() {
        let mut dashboard = open();
        dashboard.import_json("{\"contribution\": \"$5\"}").unwrap();
        let text = growth_curve(&dashboard);
        assert!(text.contains("no curve for contribution \"$5\""));
        assert!(!text.contains("Month 1"));
    }

    #[test]
    fn dashboard_has_all_sections() {
        let text = dashboard(&open());
        assert!(text.starts_with(TITLE));
        assert!(text.contains("Portfolio Allocation"));
        assert!(text.contains("Real-Time Prices Snapshot"));
        assert!(text.contains("Simulated Growth ($500/mo)"));
    }
}
