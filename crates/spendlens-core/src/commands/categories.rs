use crate::EngineResult;
use crate::analytics::category::{
    CategoryGrid, by_category, category_month_grid, category_year_totals,
};
use crate::analytics::date::format_iso_date;
use crate::commands::common::{SelectionArgs, SourceOptions, category_rows, period_label, prepare};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CategoriesData, CategoryGridData, GridRowData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Month,
    Year,
}

#[derive(Debug, Clone)]
pub struct CategoriesOptions<'a> {
    pub source: SourceOptions<'a>,
    pub selection: SelectionArgs,
    pub grid: Option<GridKind>,
}

pub fn run(path: &str, selection: SelectionArgs) -> EngineResult<SuccessEnvelope> {
    run_with_options(CategoriesOptions {
        source: SourceOptions::from_path(path),
        selection,
        grid: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: CategoriesOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(&options.source, &options.selection, "categories")?;
    let totals = by_category(&prepared.selected);

    let grid = options.grid.map(|kind| {
        let grid = match kind {
            GridKind::Month => {
                category_month_grid(&prepared.selected, prepared.request.window.bucket_span())
            }
            GridKind::Year => category_year_totals(&prepared.selected),
        };
        grid_data(&grid)
    });

    let data = CategoriesData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        rows: category_rows(&totals),
        grid,
    };
    success("categories", data)
}

fn grid_data(grid: &CategoryGrid) -> CategoryGridData {
    CategoryGridData {
        granularity: grid.granularity.as_str().to_string(),
        categories: grid.categories.clone(),
        rows: grid
            .periods
            .iter()
            .map(|period| GridRowData {
                start: format_iso_date(&period.start),
                label: period_label(grid.granularity, period.start),
                cells: period.cells.clone(),
                total: period.total,
            })
            .collect(),
    }
}
