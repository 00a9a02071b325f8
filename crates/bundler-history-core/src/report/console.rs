use crate::model::{Outcome, PivotTable};

pub fn print_summary(tables: &[PivotTable]) {
    eprint!("{}", render_summary(tables));
}

pub fn render_summary(tables: &[PivotTable]) -> String {
    let mut out = String::new();
    let mut total_tests = 0;
    let mut total_flipped = 0;

    for t in tables {
        let flipped: Vec<_> = t.flipped().collect();
        total_tests += t.rows.len();
        total_flipped += flipped.len();

        let icon = if flipped.is_empty() { "✅" } else { "⚠️ " };
        out.push_str(&format!(
            "{} {:<20} {} tests, {} runs, {} flipped\n",
            icon,
            t.component,
            t.rows.len(),
            t.columns.len(),
            flipped.len()
        ));
        for row in flipped {
            let history: String = row
                .cells
                .iter()
                .map(|o| match o {
                    Outcome::Success => '✅',
                    Outcome::Failure => '❌',
                })
                .collect();
            out.push_str(&format!("    {}  {}\n", history, row.test_name));
        }
    }

    out.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out.push_str(&format!(
        "Summary: {} components, {} tests, {} flipped\n",
        tables.len(),
        total_tests,
        total_flipped
    ));
    out
}
