//! Render request payloads.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Body of `v1/generate` and `v1/generate-async`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfGenerateRequest {
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<PdfOptions>,
}

impl PdfGenerateRequest {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: PdfOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Local pre-flight check; runs before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.html.trim().is_empty() {
            return Err(Error::validation_with_context(
                "PdfGenerateRequest.html must be a non-empty string",
                ErrorContext::new()
                    .with_field_path("request.html")
                    .with_source("request_validator"),
            ));
        }
        Ok(())
    }

    /// The request as it goes on the wire, with option precedence applied.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            html: self.html.clone(),
            options: self.options.as_ref().map(PdfOptions::normalized),
        }
    }
}

/// Optional wkhtmltopdf-style rendering tweaks. Unset fields are omitted from the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_media_type: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_smart_shrinking: Option<bool>,
    /// Overridden by `disable_javascript` when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_javascript: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_javascript: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_center: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_center: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_dpi: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_quality: Option<bool>,
    /// Overridden by `no_images` when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<bool>,
    /// Deprecated: prefer `images: Some(false)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_images: Option<bool>,
}

impl PdfOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, size: impl Into<String>) -> Self {
        self.page_size = Some(size.into());
        self
    }

    pub fn orientation(mut self, orientation: impl Into<String>) -> Self {
        self.orientation = Some(orientation.into());
        self
    }

    /// Set all four margins (millimetres).
    pub fn margins(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.margin_top = Some(top);
        self.margin_right = Some(right);
        self.margin_bottom = Some(bottom);
        self.margin_left = Some(left);
        self
    }

    pub fn header_html(mut self, html: impl Into<String>) -> Self {
        self.header_html = Some(html.into());
        self
    }

    pub fn footer_html(mut self, html: impl Into<String>) -> Self {
        self.footer_html = Some(html.into());
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn javascript(mut self, enabled: bool) -> Self {
        if enabled {
            self.enable_javascript = Some(true);
            self.disable_javascript = None;
        } else {
            self.enable_javascript = None;
            self.disable_javascript = Some(true);
        }
        self
    }

    pub fn images(mut self, enabled: bool) -> Self {
        self.images = Some(enabled);
        self.no_images = None;
        self
    }

    /// Resolved JavaScript setting; `disable_javascript` wins over `enable_javascript`.
    pub fn javascript_enabled(&self) -> Option<bool> {
        if self.disable_javascript == Some(true) {
            return Some(false);
        }
        match (self.enable_javascript, self.disable_javascript) {
            (Some(enabled), _) => Some(enabled),
            (None, Some(false)) => Some(true),
            (None, _) => None,
        }
    }

    /// Resolved image setting; `no_images` wins over `images`.
    pub fn images_enabled(&self) -> Option<bool> {
        if self.no_images == Some(true) {
            return Some(false);
        }
        match (self.images, self.no_images) {
            (Some(enabled), _) => Some(enabled),
            (None, Some(false)) => Some(true),
            (None, _) => None,
        }
    }

    /// Copy with the losing side of each enable/disable pair removed.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        if out.disable_javascript == Some(true) {
            out.enable_javascript = None;
        }
        if out.no_images == Some(true) {
            out.images = Some(false);
            out.no_images = None;
        }
        out
    }
}
