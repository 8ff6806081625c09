//! Fixture builders shared by unit tests across modules.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use candle_core::{Device, Tensor};
use serde_json::json;
use zip::write::SimpleFileOptions;

/// Writes a minimal DOCX whose body holds one run per paragraph.
/// Paragraph strings are inserted verbatim, so XML entities must be pre-escaped.
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// Four-term unigram vocabulary with unit idf.
pub fn write_vectorizer(path: &Path) {
    let artifact = json!({
        "vocabulary": {"python": 0, "sql": 1, "kubernetes": 2, "figma": 3},
        "idf": [1.0, 1.0, 1.0, 1.0],
    });
    std::fs::write(path, artifact.to_string()).unwrap();
}

/// Single dense layer mapping the four vocabulary terms onto three categories:
/// python/sql → 0, kubernetes → 1, figma → 2.
pub fn write_classifier(path: &Path) {
    let device = Device::Cpu;
    let weight = Tensor::from_vec(
        vec![
            4.0f32, 4.0, 0.0, 0.0, //
            0.0, 0.0, 4.0, 0.0, //
            0.0, 0.0, 0.0, 4.0,
        ],
        (3, 4),
        &device,
    )
    .unwrap();
    let bias = Tensor::zeros(3, candle_core::DType::F32, &device).unwrap();
    let tensors = HashMap::from([
        ("dense_0.weight".to_string(), weight),
        ("dense_0.bias".to_string(), bias),
    ]);
    candle_core::safetensors::save(&tensors, path).unwrap();
}

/// Minimal PDF with one Helvetica page per entry. An empty entry gives a page with
/// no content operators at all.
pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        let content = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET")
        };
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = out.len();
    let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        tail.push_str(&format!("{offset:010} 00000 n \n"));
    }
    tail.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    out.extend_from_slice(tail.as_bytes());
    out
}
