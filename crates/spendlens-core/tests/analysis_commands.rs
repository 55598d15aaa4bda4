mod support;

use spendlens_core::analytics::date::Granularity;
use spendlens_core::analytics::ranking::Order;
use spendlens_core::commands::buckets::{self, BucketsOptions};
use spendlens_core::commands::categories::{self, CategoriesOptions, GridKind};
use spendlens_core::commands::common::SelectionArgs;
use spendlens_core::commands::month::{self, MonthOptions};
use spendlens_core::commands::patterns::{self, PatternOptions, PatternOverrides};
use spendlens_core::commands::summary;
use spendlens_core::commands::top::{self, TopOptions};
use support::ledger_testkit::{COFFEE_AND_GAME_CSV, close, payload, rows, workspace, year};

#[test]
fn summary_of_coffee_and_game_totals_sixty_nine() {
    if let Some(space) = workspace("spendlens-summary") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);
        let value = payload(summary::run_with_options(
            &space.source(&path),
            &SelectionArgs::default(),
        ));
        let stats = &value["data"]["stats"];
        assert!(close(&stats["total"], 69.0));
        assert_eq!(stats["count"], 3);
        assert!(close(&stats["median"], 4.5));
        assert_eq!(value["data"]["selection"]["window"], "All");
        assert_eq!(value["data"]["ledger"]["summary"]["rows_kept"], 3);
        assert_eq!(value["command"], "summary");
    }
}

#[test]
fn category_filter_narrows_the_summary() {
    if let Some(space) = workspace("spendlens-summary-filter") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);
        let selection = SelectionArgs {
            categories: vec!["Gaming".to_string()],
            ..SelectionArgs::default()
        };
        let value = payload(summary::run_with_options(&space.source(&path), &selection));
        assert!(close(&value["data"]["stats"]["total"], 60.0));
        assert_eq!(value["data"]["selection"]["rows_selected"], 1);
    }
}

#[test]
fn search_below_two_characters_is_not_applied() {
    if let Some(space) = workspace("spendlens-search") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);
        let short = SelectionArgs {
            search: Some("o".to_string()),
            ..SelectionArgs::default()
        };
        let value = payload(summary::run_with_options(&space.source(&path), &short));
        assert_eq!(value["data"]["stats"]["count"], 3);
        assert!(value["data"]["selection"]["search"].is_null());

        let notes = SelectionArgs {
            search: Some("SALE".to_string()),
            ..SelectionArgs::default()
        };
        let value = payload(summary::run_with_options(&space.source(&path), &notes));
        assert_eq!(value["data"]["stats"]["count"], 1);
    }
}

#[test]
fn header_only_ledger_summarizes_to_zeros() {
    if let Some(space) = workspace("spendlens-empty") {
        let path = space.write_ledger("empty.csv", "Item,Category,Cost,Date\n");
        let value = payload(summary::run_with_options(
            &space.source(&path),
            &SelectionArgs::default(),
        ));
        let stats = &value["data"]["stats"];
        assert_eq!(stats["count"], 0);
        assert!(close(&stats["total"], 0.0));
        assert!(close(&stats["volatility"], 0.0));
        assert!(value["data"]["ledger"]["data_range_hint"]["earliest"].is_null());
    }
}

#[test]
fn ledger_can_be_piped_through_stdin() {
    if let Some(space) = workspace("spendlens-stdin") {
        let value = payload(summary::run_with_options(
            &space.stdin_source(COFFEE_AND_GAME_CSV),
            &SelectionArgs::default(),
        ));
        assert_eq!(value["data"]["ledger"]["source_kind"], "stdin");
        assert!(close(&value["data"]["stats"]["total"], 69.0));
    }
}

#[test]
fn invalid_selection_arguments_are_rejected_before_reading() {
    if let Some(space) = workspace("spendlens-args") {
        let inverted = SelectionArgs {
            from: Some("2024-03-01".to_string()),
            to: Some("2024-02-01".to_string()),
            ..SelectionArgs::default()
        };
        let result = summary::run_with_options(&space.source("/no/such/file.csv"), &inverted);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
            assert!(error.message.contains("from"));
        }

        let bad_calendar = SelectionArgs {
            from: Some("2024-02-31".to_string()),
            ..SelectionArgs::default()
        };
        let result = summary::run_with_options(&space.source("/no/such/file.csv"), &bad_calendar);
        assert!(result.is_err());
        if let Err(error) = result {
            assert!(error.message.contains("calendar"));
        }
    }
}

#[test]
fn monthly_buckets_for_a_year_are_dense() {
    if let Some(space) = workspace("spendlens-buckets-year") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);
        let value = payload(buckets::run_with_options(BucketsOptions {
            source: space.source(&path),
            selection: year(2024),
            granularity: Granularity::Month,
            dense: false,
            rolling_window: None,
        }));
        let buckets = rows(&value);
        assert_eq!(buckets.len(), 12);
        assert_eq!(value["data"]["dense"], true);
        assert_eq!(value["data"]["active_buckets"], 2);
        assert!(close(&buckets[0]["total"], 9.0));
        assert!(close(&buckets[1]["total"], 60.0));
        assert_eq!(buckets[0]["label"], "Jan 2024");
        assert!(close(&buckets[11]["cumulative"], 69.0));
        let sum = buckets
            .iter()
            .filter_map(|bucket| bucket["total"].as_f64())
            .sum::<f64>();
        assert!((sum - 69.0).abs() < 1e-9);
    }
}

#[test]
fn inferred_buckets_are_sparse_unless_dense_is_requested() {
    let ledger = "Item,Category,Cost,Date\nCoffee,Food,4.5,2024-01-05\nGame,Gaming,60,2024-04-01\n";
    if let Some(space) = workspace("spendlens-buckets-sparse") {
        let path = space.write_ledger("ledger.csv", ledger);
        let sparse = payload(buckets::run(&path, SelectionArgs::default(), Granularity::Month));
        assert_eq!(rows(&sparse).len(), 2);

        let dense = payload(buckets::run_with_options(BucketsOptions {
            source: space.source(&path),
            selection: SelectionArgs::default(),
            granularity: Granularity::Month,
            dense: true,
            rolling_window: Some(2),
        }));
        let dense_rows = rows(&dense);
        assert_eq!(dense_rows.len(), 4);
        assert!(close(&dense_rows[1]["total"], 0.0));
        assert!(close(&dense_rows[1]["rolling_average"], 2.25));
    }
}

#[test]
fn weekly_buckets_report_their_sunday_start() {
    if let Some(space) = workspace("spendlens-buckets-week") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);
        let value = payload(buckets::run_with_options(BucketsOptions {
            source: space.source(&path),
            selection: SelectionArgs::default(),
            granularity: Granularity::Week,
            dense: false,
            rolling_window: None,
        }));
        assert_eq!(value["data"]["week_start"], "Sun");
        assert_eq!(rows(&value)[0]["start"], "2023-12-31");
    }
}

#[test]
fn categories_rank_by_total_and_expose_a_month_grid() {
    if let Some(space) = workspace("spendlens-categories") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);
        let value = payload(categories::run_with_options(CategoriesOptions {
            source: space.source(&path),
            selection: year(2024),
            grid: Some(GridKind::Month),
        }));
        let categories = rows(&value);
        assert_eq!(categories[0]["category"], "Gaming");
        assert_eq!(categories[1]["top_item"], "Coffee");
        assert_eq!(categories[1]["count"], 2);

        let grid = &value["data"]["grid"];
        assert_eq!(grid["rows"].as_array().map(Vec::len), Some(12));
        assert_eq!(grid["categories"][0], "Food & Beverages");
    }
}

#[test]
fn top_items_are_unique_by_name() {
    if let Some(space) = workspace("spendlens-top") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);
        let value = payload(top::run_with_options(TopOptions {
            source: space.source(&path),
            selection: SelectionArgs::default(),
            limit: None,
            order: Order::Descending,
        }));
        let names = rows(&value)
            .iter()
            .filter_map(|row| row["item"].as_str().map(str::to_string))
            .collect::<Vec<String>>();
        assert_eq!(names, vec!["Game", "Coffee"]);
        assert_eq!(value["data"]["limit"], 10);

        let zero = top::run_with_options(TopOptions {
            source: space.source(&path),
            selection: SelectionArgs::default(),
            limit: Some(0),
            order: Order::Ascending,
        });
        assert!(zero.is_err());
    }
}

#[test]
fn recurring_and_sneaky_follow_threshold_overrides() {
    if let Some(space) = workspace("spendlens-patterns") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);

        let mut options = PatternOptions::new(space.source(&path), SelectionArgs::default());
        options.overrides = PatternOverrides {
            threshold: Some(1),
            ..PatternOverrides::default()
        };
        let value = payload(patterns::recurring(options));
        let recurring = rows(&value);
        assert_eq!(recurring.len(), 1);
        assert_eq!(recurring[0]["item"], "Coffee");
        assert_eq!(recurring[0]["count"], 2);
        assert!(close(&recurring[0]["total"], 9.0));

        let mut options = PatternOptions::new(space.source(&path), SelectionArgs::default());
        options.overrides = PatternOverrides {
            threshold: None,
            item_cost_cap: Some(5.0),
            total_floor: Some(8.0),
        };
        let value = payload(patterns::sneaky(options));
        let sneaky = rows(&value);
        assert_eq!(sneaky.len(), 1);
        assert!(close(&sneaky[0]["total"], 9.0));
        assert_eq!(value["data"]["policy_version"], "patterns/v1");

        let defaults = payload(patterns::recurring(PatternOptions::new(
            space.source(&path),
            SelectionArgs::default(),
        )));
        assert!(rows(&defaults).is_empty());
        assert_eq!(defaults["data"]["thresholds"]["count_above"], 5);
    }
}

#[test]
fn newly_recurring_and_large_purchases_use_policy_defaults() {
    let mut ledger = String::from("Item,Category,Cost,Date\n");
    for month in 7..=10 {
        ledger.push_str(&format!("Gym,Health & Personal Care,30,2024-{month:02}-01\n"));
    }
    for day in 1..=8 {
        ledger.push_str(&format!("Coffee,Food & Beverages,4,2024-03-{day:02}\n"));
    }
    ledger.push_str("Laptop,Electronics & Accessories,900,2024-05-01\n");

    if let Some(space) = workspace("spendlens-newly-large") {
        let path = space.write_ledger("ledger.csv", &ledger);

        let value = payload(patterns::newly(PatternOptions::new(
            space.source(&path),
            SelectionArgs::default(),
        )));
        let newly = rows(&value);
        assert_eq!(newly.len(), 1);
        assert_eq!(newly[0]["item"], "Gym");

        let value = payload(patterns::large(PatternOptions::new(
            space.source(&path),
            SelectionArgs::default(),
        )));
        let large = rows(&value);
        assert_eq!(large.len(), 1);
        assert_eq!(large[0]["item"], "Laptop");
        assert!(value["data"]["threshold"].as_f64().is_some_and(|value| value > 30.0));
    }
}

#[test]
fn no_spend_lists_configured_categories_without_rows() {
    if let Some(space) = workspace("spendlens-no-spend") {
        let path = space.write_ledger("ledger.csv", COFFEE_AND_GAME_CSV);
        let value = payload(patterns::no_spend(PatternOptions::new(
            space.source(&path),
            SelectionArgs::default(),
        )));
        let missing = value["data"]["categories"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        assert_eq!(missing.len(), 9);
        assert!(!missing.iter().any(|category| category == "Gaming"));
        assert!(missing.iter().any(|category| category == "Collectibles"));
    }
}

#[test]
fn month_drill_down_lists_rows_in_date_order() {
    let ledger = "Item,Category,Cost,Date\n\
Late,Misc,2,2024-03-20\n\
Early,Misc,1,2024-03-02\n\
Other,Misc,5,2024-04-01\n";
    if let Some(space) = workspace("spendlens-month") {
        let path = space.write_ledger("ledger.csv", ledger);
        let value = payload(month::run_with_options(MonthOptions {
            source: space.source(&path),
            selection: SelectionArgs::default(),
            year: 2024,
            month: 3,
        }));
        let month_rows = rows(&value);
        assert_eq!(month_rows.len(), 2);
        assert_eq!(month_rows[0]["item"], "Early");
        assert_eq!(value["data"]["label"], "Mar 2024");
        assert!(close(&value["data"]["total"], 3.0));

        let invalid = month::run(&path, 2024, 13);
        assert!(invalid.is_err());
    }
}
