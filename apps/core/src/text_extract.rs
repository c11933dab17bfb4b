//! Transcript extraction for various file formats
//! Supports: TXT, MD, CSV, JSON, VTT, SRT, PDF, DOCX

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::error::AppError;

// NOTE: expect() is acceptable here per STANDARDS.md: static patterns.
static CUE_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\d:.,]+\s*-->\s*[\d:.,]+").expect("Invalid regex: cue timing")
});
static CUE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s*$").expect("Invalid regex: cue number"));
static VOICE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<v(?:\.[^\s>]+)*\s+([^>]+)>(.*)$").expect("Invalid regex: voice tag")
});
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid regex: markup tag"));

/// Extract transcript text from file data based on file extension
pub fn extract_text_from_file(file_name: &str, file_data: &[u8]) -> Result<String, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    info!("Extracting transcript from file: {} (type: {})", file_name, extension);

    match extension.as_str() {
        // Plain text formats - direct UTF-8 conversion
        "txt" | "md" | "csv" | "json" => Ok(String::from_utf8(file_data.to_vec())?),

        // Subtitle exports from meeting tools
        "vtt" | "srt" => {
            let raw = String::from_utf8(file_data.to_vec())?;
            Ok(extract_subtitle_text(&raw))
        }

        "pdf" => extract_pdf_text(file_data),

        "docx" => extract_docx_text(file_data),

        _ => Err(AppError::UnsupportedFormat(extension)),
    }
}

/// Read a transcript file from disk and extract its text
pub fn extract_text_from_path(path: &Path) -> Result<String, AppError> {
    let data = std::fs::read(path)?;
    extract_text_from_file(&path.to_string_lossy(), &data)
}

/// Turn WebVTT / SRT cues into "Speaker: utterance" lines
pub fn extract_subtitle_text(raw: &str) -> String {
    let lines: Vec<String> = raw
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter(|line| {
            !(line.starts_with("WEBVTT")
                || line.starts_with("NOTE")
                || line.starts_with("STYLE")
                || line.starts_with("REGION"))
        })
        .filter(|line| !CUE_TIMING.is_match(line) && !CUE_NUMBER.is_match(line))
        .map(|line| match VOICE_TAG.captures(line) {
            Some(caps) => {
                let speaker = caps[1].trim();
                let utterance = MARKUP_TAG.replace_all(&caps[2], "");
                format!("{}: {}", speaker, utterance.trim())
            }
            None => MARKUP_TAG.replace_all(line, "").trim().to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}

/// Extract text from PDF file
fn extract_pdf_text(file_data: &[u8]) -> Result<String, AppError> {
    info!("Extracting text from PDF...");

    match pdf_extract::extract_text_from_mem(file_data) {
        Ok(text) => {
            let cleaned = clean_extracted_text(&text);
            info!("PDF extraction successful: {} characters", cleaned.len());
            Ok(cleaned)
        }
        Err(e) => {
            warn!("PDF extraction failed: {}", e);
            Err(AppError::Extraction(format!("Failed to extract PDF text: {}", e)))
        }
    }
}

/// Extract text from DOCX file
fn extract_docx_text(file_data: &[u8]) -> Result<String, AppError> {
    info!("Extracting text from DOCX...");

    let docx = docx_rs::read_docx(file_data).map_err(|e| {
        warn!("DOCX extraction failed: {}", e);
        AppError::Extraction(format!("Failed to extract DOCX text: {}", e))
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .into_iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(para) => Some(paragraph_text(&para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    let cleaned = clean_extracted_text(&paragraphs.join("\n"));
    info!("DOCX extraction successful: {} characters", cleaned.len());
    Ok(cleaned)
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    para.children
        .iter()
        .filter_map(|pc| match pc {
            docx_rs::ParagraphChild::Run(run) => Some(
                run.children
                    .iter()
                    .filter_map(|rc| match rc {
                        docx_rs::RunChild::Text(t) => Some(t.text.as_str()),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect()
}

/// Clean up extracted text
fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
