//! Bulk file downloads.
//!
//! Bulk files are full snapshots published on a static host. They are fetched
//! with a single plain GET: no retry policy, no JSON handling, redirects
//! followed. Anything but a 200 is reported as [`Error::BulkFile`].

use crate::{Error, Result, SwcClient};
use bytes::Bytes;
use http::StatusCode;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::Instrument;
use url::Url;

/// File format of the downloaded bulk files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BulkFileFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Apache Parquet.
    Parquet,
}

impl BulkFileFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            BulkFileFormat::Csv => "csv",
            BulkFileFormat::Parquet => "parquet",
        }
    }

    /// Lenient parse used for configuration values: anything that is not
    /// `parquet` (case-insensitive) selects CSV.
    pub fn from_config_value(value: &str) -> Self {
        match value.parse() {
            Ok(format) => format,
            Err(_) => {
                tracing::warn!(value = %value, "Unknown bulk file format, using csv");
                BulkFileFormat::Csv
            }
        }
    }
}

impl FromStr for BulkFileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(BulkFileFormat::Csv),
            "parquet" => Ok(BulkFileFormat::Parquet),
            other => Err(Error::Configuration(format!(
                "Unknown bulk file format {other:?}, expected csv or parquet"
            ))),
        }
    }
}

impl fmt::Display for BulkFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A bulk data export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkFile {
    /// `player_data`
    Players,
    /// `league_data`
    Leagues,
    /// `performance_data`
    Performances,
    /// `team_data`
    Teams,
    /// `team_player_data`
    TeamPlayers,
}

impl BulkFile {
    /// Every published bulk file.
    pub const ALL: [BulkFile; 5] = [
        BulkFile::Players,
        BulkFile::Leagues,
        BulkFile::Performances,
        BulkFile::Teams,
        BulkFile::TeamPlayers,
    ];

    /// File name without extension.
    pub fn stem(&self) -> &'static str {
        match self {
            BulkFile::Players => "player_data",
            BulkFile::Leagues => "league_data",
            BulkFile::Performances => "performance_data",
            BulkFile::Teams => "team_data",
            BulkFile::TeamPlayers => "team_player_data",
        }
    }

    /// File name with the extension for `format`.
    pub fn file_name(&self, format: BulkFileFormat) -> String {
        format!("{}.{}", self.stem(), format.extension())
    }
}

/// File name for every bulk file in the given format.
pub(crate) fn bulk_file_names(format: BulkFileFormat) -> HashMap<BulkFile, String> {
    BulkFile::ALL
        .iter()
        .map(|file| (*file, file.file_name(format)))
        .collect()
}

impl SwcClient {
    /// The file name `file` is published under, in the configured format.
    pub fn bulk_file_name(&self, file: BulkFile) -> &str {
        self.inner
            .bulk_file_names
            .get(&file)
            .map(String::as_str)
            .unwrap_or_else(|| file.stem())
    }

    /// The full download URL for `file`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the file name cannot be joined onto
    /// the bulk base URL.
    pub fn bulk_file_url(&self, file: BulkFile) -> Result<Url> {
        Ok(self
            .inner
            .config
            .bulk_base_url
            .join(self.bulk_file_name(file))?)
    }

    /// Downloads one bulk file and returns its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] on transport failure and
    /// [`Error::BulkFile`] if the host answers with anything but 200.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use swc_sdk::{BulkFile, BulkFileFormat, SwcClient, SwcConfig};
    ///
    /// # async fn example() -> Result<(), swc_sdk::Error> {
    /// let config = SwcConfig::builder()
    ///     .base_url("http://localhost:8000")?
    ///     .bulk_file_format(BulkFileFormat::Parquet)
    ///     .build()?;
    /// let client = SwcClient::new(config)?;
    ///
    /// let players = client.get_bulk_file(BulkFile::Players).await?;
    /// std::fs::write("player_data.parquet", &players).ok();
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_bulk_file(&self, file: BulkFile) -> Result<Bytes> {
        self.download_bulk_file(file)
            .instrument(self.inner.span.clone())
            .await
    }

    async fn download_bulk_file(&self, file: BulkFile) -> Result<Bytes> {
        let url = self.bulk_file_url(file)?;
        tracing::debug!(file = ?file, url = %url, "Downloading bulk file");

        let mut request = self.inner.http_client.get(url);
        if let Some(timeout) = self.inner.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            tracing::error!(
                file = ?file,
                status = status.as_u16(),
                "Bulk file download failed"
            );
            return Err(Error::BulkFile {
                file: self.bulk_file_name(file).to_string(),
                status,
            });
        }

        let content = response.bytes().await?;
        tracing::debug!(file = ?file, bytes = content.len(), "File downloaded successfully");
        Ok(content)
    }

    /// Downloads the player bulk file.
    pub async fn get_bulk_player_file(&self) -> Result<Bytes> {
        self.get_bulk_file(BulkFile::Players).await
    }

    /// Downloads the league bulk file.
    pub async fn get_bulk_league_file(&self) -> Result<Bytes> {
        self.get_bulk_file(BulkFile::Leagues).await
    }

    /// Downloads the performance bulk file.
    pub async fn get_bulk_performance_file(&self) -> Result<Bytes> {
        self.get_bulk_file(BulkFile::Performances).await
    }

    /// Downloads the team bulk file.
    pub async fn get_bulk_team_file(&self) -> Result<Bytes> {
        self.get_bulk_file(BulkFile::Teams).await
    }

    /// Downloads the team/player membership bulk file.
    pub async fn get_bulk_team_player_file(&self) -> Result<Bytes> {
        self.get_bulk_file(BulkFile::TeamPlayers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_format() {
        assert_eq!(BulkFile::Players.file_name(BulkFileFormat::Csv), "player_data.csv");
        assert_eq!(
            BulkFile::TeamPlayers.file_name(BulkFileFormat::Parquet),
            "team_player_data.parquet"
        );

        let names = bulk_file_names(BulkFileFormat::Parquet);
        assert_eq!(names.len(), 5);
        assert_eq!(names[&BulkFile::Performances], "performance_data.parquet");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("Parquet".parse::<BulkFileFormat>().unwrap(), BulkFileFormat::Parquet);
        assert_eq!(" csv ".parse::<BulkFileFormat>().unwrap(), BulkFileFormat::Csv);
        assert!("json".parse::<BulkFileFormat>().is_err());
        assert_eq!(BulkFileFormat::from_config_value("json"), BulkFileFormat::Csv);
        assert_eq!(BulkFileFormat::Parquet.to_string(), "parquet");
    }
}
