use chrono::{DateTime, Utc};
use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};

/// One deployed contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub name: String,
    pub contract: String,
    pub address: Address,
    pub bytecode_size: usize,
}

/// Outcome of a deployment run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub plan: String,
    pub deployer: Address,
    pub started_at: DateTime<Utc>,
    pub records: Vec<DeploymentRecord>,
}

impl DeploymentSummary {
    pub fn address_of(&self, name: &str) -> Option<Address> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.address)
    }

    /// `<name> deployed to: <address>`, one line per record
    pub fn render_deployed_to(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{} deployed to: {}\n", r.name, to_checksum(&r.address, None)))
            .collect()
    }

    /// Render `(index) | name | address | bytecode size` rows
    pub fn render_table(&self) -> String {
        let headers = ["(index)", "name", "address", "bytecode size"];
        let rows: Vec<[String; 4]> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                [
                    i.to_string(),
                    r.name.clone(),
                    to_checksum(&r.address, None),
                    r.bytecode_size.to_string(),
                ]
            })
            .collect();

        let mut widths = headers.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let separator = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");

        let format_row = |cells: &[String]| {
            cells
                .iter()
                .zip(widths.iter())
                .map(|(cell, w)| format!(" {:<width$} ", cell, width = *w))
                .collect::<Vec<_>>()
                .join("|")
        };

        let mut out = String::new();
        out.push_str(&format_row(&headers.map(String::from)[..]));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        for row in &rows {
            out.push_str(&format_row(&row[..]));
            out.push('\n');
        }
        out
    }
}
