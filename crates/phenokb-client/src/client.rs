//! Reqwest client for the curation service endpoints.
//! See ARCHITECTURE.md §4.1
//!
//! Endpoint classes map onto the error taxonomy: reads fail as `Fetch`,
//! order/delete mutations as `Commit`, multipart uploads as `Upload`.
//! Transport-level failures surface as `Http`. Every call is fire-and-once;
//! there is no automatic retry.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use tracing::{debug, instrument};

use phenokb_board::CategorizedSymptoms;
use phenokb_common::{PhenokbError, Result, SymptomRecord};

use crate::backend::CurationBackend;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct CurationClient {
    base_url: String,
    client: Client,
}

impl CurationClient {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/gene/{}", self.base_url, path)
    }

    async fn get_name_list(&self, path: &str, what: &str) -> Result<Vec<String>> {
        let resp = self.client.get(self.endpoint(path)).send().await?;
        if !resp.status().is_success() {
            return Err(PhenokbError::Fetch(format!("{what}: HTTP {}", resp.status())));
        }
        Ok(resp.json().await?)
    }

    /// GET /gene/list_genes
    #[instrument(skip(self))]
    pub async fn list_genes(&self) -> Result<Vec<String>> {
        self.get_name_list("list_genes", "gene list").await
    }

    /// GET /gene/list_categories
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        self.get_name_list("list_categories", "category list").await
    }

    /// GET /gene/list_symptoms?gene_id={gene}
    #[instrument(skip(self))]
    pub async fn list_symptoms(&self, gene: &str) -> Result<CategorizedSymptoms> {
        let resp = self.client
            .get(self.endpoint("list_symptoms"))
            .query(&[("gene_id", gene)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PhenokbError::Fetch(format!(
                "symptoms of {gene}: HTTP {}",
                resp.status()
            )));
        }
        let store: CategorizedSymptoms = resp.json().await?;
        debug!(gene, categories = store.category_count(), "fetched symptom board");
        Ok(store)
    }

    /// POST /gene/set_symptom_order — persists a full flattened ordering.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn set_symptom_order(&self, records: &[SymptomRecord]) -> Result<()> {
        let resp = self.client
            .post(self.endpoint("set_symptom_order"))
            .json(records)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PhenokbError::Commit(format!(
                "set_symptom_order: HTTP {status}: {body}"
            )));
        }
        Ok(())
    }

    /// DELETE /gene/delete_symptom?symptomId={id}
    #[instrument(skip(self))]
    pub async fn delete_symptom(&self, symptom_id: &str) -> Result<()> {
        let resp = self.client
            .delete(self.endpoint("delete_symptom"))
            .query(&[("symptomId", symptom_id)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PhenokbError::Commit(format!(
                "delete_symptom {symptom_id}: HTTP {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// GET /gene/list_excel_files
    #[instrument(skip(self))]
    pub async fn list_excel_files(&self) -> Result<Vec<String>> {
        self.get_name_list("list_excel_files", "spreadsheet list").await
    }

    /// DELETE /gene/delete_excel_file?fileId={id}
    #[instrument(skip(self))]
    pub async fn delete_excel_file(&self, file_id: &str) -> Result<()> {
        let resp = self.client
            .delete(self.endpoint("delete_excel_file"))
            .query(&[("fileId", file_id)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PhenokbError::Commit(format!(
                "delete_excel_file {file_id}: HTTP {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// POST /gene/add_new_gene (multipart) — uploads a new gene spreadsheet.
    #[instrument(skip(self))]
    pub async fn add_new_gene(&self, spreadsheet: &Path) -> Result<()> {
        let form = spreadsheet_form(spreadsheet, XLSX_MIME).await?;
        let resp = self.client
            .post(self.endpoint("add_new_gene"))
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PhenokbError::Upload(format!(
                "add_new_gene: HTTP {status}: {body}"
            )));
        }
        Ok(())
    }

    /// POST /gene/update_excel_file?fileId={id} (multipart) — replaces an
    /// existing gene spreadsheet.
    #[instrument(skip(self))]
    pub async fn update_excel_file(&self, file_id: &str, spreadsheet: &Path) -> Result<()> {
        let form = spreadsheet_form(spreadsheet, XLSX_MIME).await?;
        let resp = self.client
            .post(self.endpoint("update_excel_file"))
            .query(&[("fileId", file_id)])
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PhenokbError::Upload(format!(
                "update_excel_file {file_id}: HTTP {status}: {body}"
            )));
        }
        Ok(())
    }

    /// GET /gene/get_errors — the spreadsheet import error log.
    #[instrument(skip(self))]
    pub async fn get_errors(&self) -> Result<Vec<String>> {
        self.get_name_list("get_errors", "import error log").await
    }

    /// POST /gene/upload_configuration (multipart zip).
    #[instrument(skip(self))]
    pub async fn upload_configuration(&self, archive: &Path) -> Result<()> {
        let bytes = tokio::fs::read(archive).await?;
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name_of(archive))
            .mime_str("application/zip")?;
        let form = multipart::Form::new().part("zip", part);

        let resp = self.client
            .post(self.endpoint("upload_configuration"))
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PhenokbError::Upload(format!(
                "upload_configuration: HTTP {status}: {body}"
            )));
        }
        Ok(())
    }

    /// GET /gene/download_configuration — streams the configuration archive
    /// into `dest`.
    #[instrument(skip(self))]
    pub async fn download_configuration(&self, dest: &Path) -> Result<()> {
        let resp = self.client
            .get(self.endpoint("download_configuration"))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PhenokbError::Fetch(format!(
                "download_configuration: HTTP {}",
                resp.status()
            )));
        }
        let bytes = resp.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        debug!(dest = %dest.display(), size = bytes.len(), "configuration archive saved");
        Ok(())
    }
}

/// Build the single-field multipart form the spreadsheet endpoints expect.
async fn spreadsheet_form(path: &Path, mime: &str) -> Result<multipart::Form> {
    let bytes = tokio::fs::read(path).await?;
    let part = multipart::Part::bytes(bytes)
        .file_name(file_name_of(path))
        .mime_str(mime)?;
    Ok(multipart::Form::new().part("file", part))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin")
        .to_string()
}

#[async_trait]
impl CurationBackend for CurationClient {
    async fn list_genes(&self) -> Result<Vec<String>> {
        CurationClient::list_genes(self).await
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        CurationClient::list_categories(self).await
    }

    async fn fetch_symptoms(&self, gene: &str) -> Result<CategorizedSymptoms> {
        self.list_symptoms(gene).await
    }

    async fn push_symptom_order(&self, records: &[SymptomRecord]) -> Result<()> {
        self.set_symptom_order(records).await
    }

    async fn delete_symptom(&self, symptom_id: &str) -> Result<()> {
        CurationClient::delete_symptom(self, symptom_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_under_gene_prefix() {
        let client = CurationClient::new(Some("http://localhost:9090/api/")).unwrap();
        assert_eq!(
            client.endpoint("list_symptoms"),
            "http://localhost:9090/api/gene/list_symptoms"
        );
    }

    #[test]
    fn test_default_base_url() {
        let client = CurationClient::new(None).unwrap();
        assert_eq!(client.endpoint("list_genes"), "http://localhost:8080/api/gene/list_genes");
    }

    #[test]
    fn test_file_name_of_falls_back_for_odd_paths() {
        assert_eq!(file_name_of(Path::new("/data/GBA.xlsx")), "GBA.xlsx");
        assert_eq!(file_name_of(Path::new("/")), "upload.bin");
    }

    #[tokio::test]
    async fn test_spreadsheet_form_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GBA.xlsx");
        tokio::fs::write(&path, b"stub sheet bytes").await.unwrap();

        let form = spreadsheet_form(&path, XLSX_MIME).await.unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[tokio::test]
    async fn test_spreadsheet_form_missing_file_is_io_error() {
        let err = spreadsheet_form(Path::new("/no/such/sheet.xlsx"), XLSX_MIME)
            .await
            .unwrap_err();
        assert!(matches!(err, PhenokbError::Io(_)));
    }
}
