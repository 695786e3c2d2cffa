//! Serialization of a generated dataset into SQL scripts or CSV files.

pub mod csv;
pub mod sql;

use std::path::Path;

use coursegen_core::{Dataset, GeneratorConfig, OutputFormat};
use tracing::info;

use crate::errors::GenerationError;
use crate::model::TableReport;
use self::sql::{
    SqlRow, create_database_statement, create_table_statements, create_view_statements,
    insert_statements,
};

/// Write `contents` to `dir/name` and return its size in bytes.
pub fn write_sql_file(dir: &Path, name: &str, contents: &str) -> Result<u64, GenerationError> {
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    info!(file = %path.display(), bytes = contents.len(), "SQL file generated");
    Ok(contents.len() as u64)
}

/// Emit DDL scripts plus one data file per table, in load order.
pub fn emit_dataset(
    dir: &Path,
    dataset: &Dataset,
    config: &GeneratorConfig,
) -> Result<Vec<TableReport>, GenerationError> {
    let output = &config.output;
    let limits = &config.limits;

    let mut reports = vec![
        ddl_report(
            dir,
            "create_database.sql",
            &create_database_statement(&output.database_name),
        )?,
        ddl_report(
            dir,
            "create_tables.sql",
            &create_table_statements(
                limits.max_courses_per_student,
                limits.max_courses_per_lecturer,
            ),
        )?,
        ddl_report(dir, "create_views.sql", create_view_statements())?,
    ];

    let mut emitter = TableEmitter {
        dir,
        format: output.format,
        batch_size: output.insert_batch_size,
        reports: &mut reports,
    };
    emitter.emit("insert_users", &dataset.users)?;
    emitter.emit("insert_lecturers", &dataset.lecturers)?;
    emitter.emit("insert_courses", &dataset.courses)?;
    emitter.emit("insert_course_lecturer", &dataset.course_lecturers)?;
    emitter.emit("insert_course_content", &dataset.course_content)?;
    emitter.emit("insert_students", &dataset.students)?;
    emitter.emit("insert_enrollments", &dataset.enrollments)?;
    emitter.emit("insert_assignments", &dataset.assignments)?;
    emitter.emit("insert_forums", &dataset.forums)?;
    emitter.emit("insert_threads", &dataset.threads)?;
    emitter.emit("insert_events", &dataset.events)?;

    Ok(reports)
}

struct TableEmitter<'a> {
    dir: &'a Path,
    format: OutputFormat,
    batch_size: usize,
    reports: &'a mut Vec<TableReport>,
}

impl TableEmitter<'_> {
    fn emit<T: SqlRow>(&mut self, stem: &str, rows: &[T]) -> Result<(), GenerationError> {
        let (file, bytes) = match self.format {
            OutputFormat::Sql => {
                let file = format!("{stem}.sql");
                let bytes =
                    write_sql_file(self.dir, &file, &insert_statements(rows, self.batch_size))?;
                (file, bytes)
            }
            OutputFormat::Csv => {
                let file = format!("{}.csv", T::TABLE);
                let bytes = csv::write_table_csv(&self.dir.join(&file), rows)?;
                info!(file = %file, bytes, "CSV file generated");
                (file, bytes)
            }
        };
        self.reports.push(TableReport {
            table: T::TABLE.to_string(),
            rows_requested: None,
            rows_generated: rows.len() as u64,
            file,
            bytes,
        });
        Ok(())
    }
}

fn ddl_report(dir: &Path, file: &str, contents: &str) -> Result<TableReport, GenerationError> {
    let bytes = write_sql_file(dir, file, contents)?;
    Ok(TableReport {
        table: file.trim_end_matches(".sql").to_string(),
        rows_requested: None,
        rows_generated: 0,
        file: file.to_string(),
        bytes,
    })
}
