use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::errors::HistoryResult;
use crate::model::{FlipFlag, HistoryDocument, Outcome, PivotColumn, PivotRow, PivotTable};
use crate::timestamp;

/// test name -> (timestamp token -> outcome), in first-seen order.
type TestOutcomes = IndexMap<String, IndexMap<String, Outcome>>;

/// Pivot a history document into one table per component.
///
/// Tables come back in the order components were first seen. Any timestamp
/// token that fails to decode aborts the whole pivot.
pub fn pivot(doc: &HistoryDocument) -> HistoryResult<Vec<PivotTable>> {
    let collected = collect(doc);

    let mut tables = Vec::with_capacity(collected.len());
    for (component, tests) in collected {
        let table = finalize(component, tests)?;
        debug!(
            component = %table.component,
            rows = table.rows.len(),
            columns = table.columns.len(),
            "pivoted component"
        );
        tables.push(table);
    }
    Ok(tables)
}

fn collect(doc: &HistoryDocument) -> IndexMap<String, TestOutcomes> {
    let mut by_component: IndexMap<String, TestOutcomes> = IndexMap::new();

    for (token, components) in doc {
        for (component, run) in components {
            let tests = by_component.entry(component.clone()).or_default();
            for (key, case) in &run.testcase {
                tests
                    .entry(case.display_name(key).to_string())
                    .or_default()
                    .insert(token.clone(), case.outcome());
            }
        }
    }

    by_component
}

fn finalize(component: String, tests: TestOutcomes) -> HistoryResult<PivotTable> {
    let tokens: IndexSet<&str> = tests
        .values()
        .flat_map(|outcomes| outcomes.keys().map(String::as_str))
        .collect();

    let mut columns = tokens
        .into_iter()
        .map(|token| {
            let at = timestamp::decode(token)?;
            Ok(PivotColumn {
                token: token.to_string(),
                header: timestamp::format(&at),
                at,
            })
        })
        .collect::<HistoryResult<Vec<_>>>()?;
    // stable: equal instants keep first-seen order
    columns.sort_by(|a, b| a.at.cmp(&b.at));

    let rows = tests
        .into_iter()
        .map(|(test_name, outcomes)| {
            let cells: Vec<Outcome> = columns
                .iter()
                .map(|c| outcomes.get(&c.token).copied().unwrap_or(Outcome::Failure))
                .collect();
            PivotRow {
                test_name,
                flag: FlipFlag::from_outcomes(&cells),
                cells,
            }
        })
        .collect();

    Ok(PivotTable {
        component,
        columns,
        rows,
    })
}
