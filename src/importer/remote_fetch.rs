// ==========================================
// 会议日程构建器 - 远程获取
// ==========================================
// 职责:
// - Google Sheets 链接 → 表格 ID → 导出为 xlsx 字节
// - 代理获取远程日程 JSON
// 约定: 固定超时、点对点同步请求、不重试；失败立即返回
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use std::sync::LazyLock;
use std::time::Duration;

static RE_SHEET_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("valid sheet id regex")
});

/// Google Sheets 导出地址模板，{id} 为占位符
pub const DEFAULT_EXPORT_URL_TEMPLATE: &str =
    "https://docs.google.com/spreadsheets/d/{id}/export?format=xlsx";

const ACCESS_DENIED_HINT: &str = "Google Sheets returned 403. Share as 'Anyone with the link (Viewer)' or 'Publish to the web'.";

/// 从 Google Sheets 链接中提取表格 ID
pub fn parse_sheet_id(url: &str) -> Option<String> {
    RE_SHEET_ID
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// 按模板生成导出地址
pub fn export_url(template: &str, sheet_id: &str) -> String {
    template.replace("{id}", sheet_id)
}

/// 下载响应状态检查: 403 单独识别为“未公开共享”
pub fn check_download_status(status: StatusCode) -> ImportResult<()> {
    if status == StatusCode::FORBIDDEN {
        return Err(ImportError::AccessDenied(ACCESS_DENIED_HINT.to_string()));
    }
    if !status.is_success() {
        return Err(ImportError::DownloadFailed(format!("HTTP {}", status)));
    }
    Ok(())
}

// ==========================================
// RemoteFetcher - 远程获取器
// ==========================================
pub struct RemoteFetcher {
    client: Client,
    export_url_template: String,
    download_timeout: Duration,
    proxy_timeout: Duration,
}

impl RemoteFetcher {
    /// 创建获取器
    ///
    /// # 参数
    /// - export_url_template: 导出地址模板（含 {id}）
    /// - download_timeout: 表格下载超时
    /// - proxy_timeout: 日程 JSON 代理超时
    pub fn new(
        export_url_template: impl Into<String>,
        download_timeout: Duration,
        proxy_timeout: Duration,
    ) -> ImportResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ImportError::InternalError(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            export_url_template: export_url_template.into(),
            download_timeout,
            proxy_timeout,
        })
    }

    /// 下载 Google 表格为 xlsx 字节
    pub fn download_sheet_xlsx(&self, sheet_id: &str) -> ImportResult<Vec<u8>> {
        let url = export_url(&self.export_url_template, sheet_id);
        tracing::info!(sheet_id, "下载 Google 表格");

        let resp = self
            .client
            .get(&url)
            .header(USER_AGENT, concat!("program-builder/", env!("CARGO_PKG_VERSION")))
            .timeout(self.download_timeout)
            .send()
            .map_err(|e| ImportError::DownloadFailed(e.to_string()))?;

        check_download_status(resp.status())?;

        let bytes = resp
            .bytes()
            .map_err(|e| ImportError::DownloadFailed(e.to_string()))?;
        tracing::debug!(sheet_id, size = bytes.len(), "下载完成");
        Ok(bytes.to_vec())
    }

    /// 获取远程日程 JSON（原样返回）
    pub fn fetch_json(&self, src: &str) -> ImportResult<serde_json::Value> {
        let resp = self
            .client
            .get(src)
            .timeout(self.proxy_timeout)
            .send()?
            .error_for_status()?;

        let text = resp.text()?;
        serde_json::from_str(&text).map_err(|e| ImportError::FetchFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sheet_id() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC-d_E9/edit#gid=0";
        assert_eq!(parse_sheet_id(url), Some("1AbC-d_E9".to_string()));
        assert_eq!(parse_sheet_id("https://example.com/sheet.xlsx"), None);
    }

    #[test]
    fn test_export_url() {
        assert_eq!(
            export_url(DEFAULT_EXPORT_URL_TEMPLATE, "abc"),
            "https://docs.google.com/spreadsheets/d/abc/export?format=xlsx"
        );
    }

    #[test]
    fn test_check_download_status() {
        assert!(check_download_status(StatusCode::OK).is_ok());
        assert!(matches!(
            check_download_status(StatusCode::FORBIDDEN),
            Err(ImportError::AccessDenied(msg)) if msg.contains("Anyone with the link")
        ));
        assert!(matches!(
            check_download_status(StatusCode::NOT_FOUND),
            Err(ImportError::DownloadFailed(_))
        ));
    }
}
