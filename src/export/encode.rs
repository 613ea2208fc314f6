//! Serializes export tables to CSV and to an HTML table that spreadsheet
//! programs open as an `.xls` file.

use csv::WriterBuilder;
use maud::{DOCTYPE, html};
use serde::Deserialize;

use crate::Error;

use super::table::ExportRow;

/// The file format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    /// An HTML table served with the Excel MIME type.
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Xlsx];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "Excel",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xls",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xlsx => "application/vnd.ms-excel",
        }
    }

    pub fn encode(self, headers: &[&str], rows: &[&ExportRow]) -> Result<Vec<u8>, Error> {
        match self {
            Self::Csv => to_csv(headers, rows),
            Self::Xlsx => Ok(to_spreadsheet_html(headers, rows)),
        }
    }
}

/// Write a header row and one record per row. Fields containing quotes,
/// commas or newlines are quoted.
fn to_csv(headers: &[&str], rows: &[&ExportRow]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row.cells)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvWriteError(error.to_string()))
}

fn to_spreadsheet_html(headers: &[&str], rows: &[&ExportRow]) -> Vec<u8> {
    let document = html! {
        (DOCTYPE)
        html
        {
            head
            {
                meta charset="UTF-8";
            }

            body
            {
                table border="1"
                {
                    thead
                    {
                        tr
                        {
                            @for header in headers
                            {
                                th { (header) }
                            }
                        }
                    }

                    tbody
                    {
                        @for row in rows
                        {
                            tr
                            {
                                @for cell in &row.cells
                                {
                                    td { (cell) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    document.into_string().into_bytes()
}
