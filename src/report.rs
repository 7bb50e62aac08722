//! Rendering a [`DiffSet`] for the console.

use std::io::{self, Write};

use serde_json::Value;

use crate::diff_set::DiffSet;

const PATH_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 18;
const RULE_WIDTH: usize = PATH_WIDTH + 2 * VALUE_WIDTH + 4;

/// Writes a fixed-width `Parameter | sample value | reference value` table, or a single
/// line when there is nothing to report.
pub fn write_table<W: Write>(w: &mut W, differences: &DiffSet) -> io::Result<()> {
    if differences.is_empty() {
        writeln!(w, "No differences found.")?;
        return Ok(());
    }

    let rule = "-".repeat(RULE_WIDTH);
    writeln!(w, "Differences between the configuration files:")?;
    writeln!(w, "{}", rule)?;
    write_row(w, "Parameter", "sample value", "reference value")?;
    writeln!(w, "{}", rule)?;
    for (path, entry) in differences {
        write_row(
            w,
            path,
            &render_cell(entry.sample.as_ref()),
            &render_cell(entry.reference.as_ref()),
        )?;
    }
    writeln!(w, "{}", rule)?;
    writeln!(
        w,
        "{} difference(s): {} changed, {} only in reference, {} only in sample",
        differences.len(),
        differences.changed(),
        differences.missing_in_sample(),
        differences.missing_in_reference(),
    )?;

    Ok(())
}

/// Writes the differences as a pretty-printed JSON object keyed by path.
pub fn write_json<W: Write>(w: &mut W, differences: &DiffSet) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, differences)?;
    writeln!(w)?;
    Ok(())
}

fn write_row<W: Write>(w: &mut W, path: &str, sample: &str, reference: &str) -> io::Result<()> {
    let line = format!(
        "{:<path_width$} | {:<value_width$} | {}",
        path,
        sample,
        reference,
        path_width = PATH_WIDTH,
        value_width = VALUE_WIDTH,
    );
    writeln!(w, "{}", line.trim_end())
}

/// Strings are shown without quotes, a missing side as `<missing>`, anything else as
/// compact JSON.
fn render_cell(value: Option<&Value>) -> String {
    match value {
        None => "<missing>".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(differences: &DiffSet, json: bool) -> String {
        let mut out = Vec::new();
        if json {
            write_json(&mut out, differences).unwrap();
        } else {
            write_table(&mut out, differences).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_set() {
        let differences = crate::compare(&json!({"a": 1}), &json!({"a": 1})).unwrap();
        assert_eq!(render(&differences, false), "No differences found.\n");
        assert_eq!(render(&differences, true), "{}\n");
    }

    #[test]
    fn table_rows() {
        let reference = json!({
            "database": {"host": "db.internal", "port": 5432},
            "features": ["a", "b"],
            "debug": false,
        });
        let sample = json!({
            "database": {"host": "localhost", "port": 5432},
            "features": ["a"],
            "name": null,
        });
        let differences = crate::compare(&reference, &sample).unwrap();

        let rule = "-".repeat(70);
        let expected = [
            "Differences between the configuration files:".to_string(),
            rule.clone(),
            format!("{:<30} | {:<18} | {}", "Parameter", "sample value", "reference value"),
            rule.clone(),
            format!("{:<30} | {:<18} | {}", "database.host", "localhost", "db.internal"),
            format!("{:<30} | {:<18} | {}", "features", "[\"a\"]", "[\"a\",\"b\"]"),
            format!("{:<30} | {:<18} | {}", "debug", "<missing>", "false"),
            format!("{:<30} | {:<18} | {}", "name", "null", "<missing>"),
            rule,
            "4 difference(s): 2 changed, 1 only in reference, 1 only in sample".to_string(),
        ]
        .join("\n")
            + "\n";

        assert_eq!(render(&differences, false), expected);
    }

    #[test]
    fn json_output() {
        let differences =
            crate::compare(&json!({"port": 80, "tls": {"on": true}}), &json!({"port": "80"})).unwrap();

        let json = render(&differences, true);
        insta::assert_snapshot!(json.trim_end(), @r###"
        {
          "port": {
            "reference": 80,
            "sample": "80"
          },
          "tls": {
            "reference": {
              "on": true
            }
          }
        }
        "###);
    }
}
