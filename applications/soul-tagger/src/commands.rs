/// Tagger commands
///
/// Each command reads the whole file, works on the tag in memory and writes
/// header, audio and trailer back in one go.
use crate::config::TaggerConfig;
use crate::error::{Result, TaggerError};
use serde::Serialize;
use soul_id3::{
    convert_tag, read_tag_with, tag_region, ConversionReport, FieldKey, FieldValue, Frame,
    FrameBody, ReadDiagnostics, Tag, TagRegion, TagVersion, TagWriter, V1Tag,
};
use std::fs;
use std::path::{Path, PathBuf};

/// A file split into its tags and the audio between them
#[derive(Debug)]
pub struct TagFile {
    path: PathBuf,
    data: Vec<u8>,
    region: TagRegion,
}

impl TagFile {
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let region = tag_region(&data);
        tracing::debug!("Opened {} ({} bytes): {:?}", path.display(), data.len(), region);
        Ok(Self {
            path: path.to_path_buf(),
            data,
            region,
        })
    }

    pub fn tag(&self, config: &TaggerConfig) -> Result<Option<Tag>> {
        match &self.region.v2 {
            Some(range) => Ok(Some(read_tag_with(&self.data[range.clone()], &config.policy)?)),
            None => Ok(None),
        }
    }

    pub fn v1(&self) -> Result<Option<V1Tag>> {
        match &self.region.v1 {
            Some(range) => Ok(Some(V1Tag::parse(&self.data[range.clone()])?)),
            None => Ok(None),
        }
    }

    fn audio(&self) -> &[u8] {
        &self.data[self.region.audio(self.data.len())]
    }

    /// Write `tag` and `v1` around the audio to `output`
    pub fn save(
        &self,
        output: &Path,
        tag: Option<&Tag>,
        v1: Option<&V1Tag>,
        config: &TaggerConfig,
    ) -> Result<()> {
        let mut out = Vec::with_capacity(self.data.len());
        if let Some(tag) = tag {
            // Keep the old footprint only when rewriting in place
            let hint = (output == self.path).then(|| self.region.v2_len()).flatten();
            let report = TagWriter::new(config.policy.clone()).write(tag, hint)?;
            for substitution in &report.substitutions {
                tracing::warn!(
                    "{} {} lost characters in {}",
                    substitution.frame,
                    substitution.field.as_str(),
                    tag.version()
                );
            }
            out.extend_from_slice(&report.bytes);
        }
        out.extend_from_slice(self.audio());
        if let Some(v1) = v1 {
            out.extend_from_slice(&v1.to_bytes());
        }
        fs::write(output, &out)?;
        tracing::info!("Wrote {} ({} bytes)", output.display(), out.len());
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct FrameSummary {
    pub id: String,
    pub description: Option<&'static str>,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct DumpReport {
    pub version: Option<TagVersion>,
    pub frames: Vec<FrameSummary>,
    pub diagnostics: Option<ReadDiagnostics>,
    pub v1: Option<V1Tag>,
}

fn describe_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Int(n) => n.to_string(),
        FieldValue::Text(t) => t.replace('\0', " / "),
        FieldValue::Pairs(p) => p
            .iter()
            .map(|(role, name)| format!("{role}: {name}"))
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::Synced(entries) => entries
            .iter()
            .map(|(line, at)| format!("[{at}] {line}"))
            .collect::<Vec<_>>()
            .join(" "),
        FieldValue::Binary(b) => format!("<{} bytes>", b.len()),
    }
}

fn summarise(frame: &Frame, version: TagVersion) -> FrameSummary {
    let value = match &frame.body {
        FrameBody::Known(body) => match frame.text() {
            Some(text) if body.fields().len() == 2 => text.replace('\0', " / "),
            _ => body
                .fields()
                .iter()
                .map(|f| format!("{}={}", f.descriptor.name.as_str(), describe_value(&f.value)))
                .collect::<Vec<_>>()
                .join("; "),
        },
        FrameBody::Unsupported(raw) => format!("<{} opaque bytes>", raw.data.len()),
    };
    FrameSummary {
        id: frame.id.to_string(),
        description: soul_id3::lookup(version, frame.id.as_str()).map(|info| info.description),
        value,
    }
}

/// Describe the tags of `path`
pub fn dump(path: &Path, json: bool, config: &TaggerConfig) -> Result<String> {
    let file = TagFile::open(path)?;
    let tag = file.tag(config)?;
    let report = DumpReport {
        version: tag.as_ref().map(Tag::version),
        frames: tag
            .as_ref()
            .map(|t| t.frames().iter().map(|f| summarise(f, t.version())).collect())
            .unwrap_or_default(),
        diagnostics: tag.as_ref().map(|t| t.diagnostics.clone()),
        v1: file.v1()?,
    };

    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = String::new();
    match report.version {
        Some(version) => out.push_str(&format!("{} tag, {} frames\n", version, report.frames.len())),
        None => out.push_str("No ID3v2 tag\n"),
    }
    for frame in &report.frames {
        out.push_str(&format!("  {:<4} {}\n", frame.id, frame.value));
    }
    if let Some(diagnostics) = &report.diagnostics {
        if diagnostics.invalid_frames + diagnostics.duplicate_frames + diagnostics.empty_frames > 0 {
            out.push_str(&format!(
                "  skipped: {} invalid, {} duplicate, {} empty\n",
                diagnostics.invalid_frames, diagnostics.duplicate_frames, diagnostics.empty_frames
            ));
        }
    }
    if let Some(v1) = &report.v1 {
        out.push_str(&format!(
            "{} trailer: {} / {} / {}\n",
            v1.version(),
            v1.title,
            v1.artist,
            v1.album
        ));
    }
    Ok(out)
}

/// Convert the v2 tag of `path` (or its v1 trailer when there is none)
pub fn convert(
    path: &Path,
    target: TagVersion,
    output: Option<&Path>,
    config: &TaggerConfig,
) -> Result<ConversionReport> {
    let file = TagFile::open(path)?;
    let v1 = file.v1()?;
    let (converted, report) = match (file.tag(config)?, &v1) {
        (Some(tag), _) => convert_tag(&tag, target)?,
        (None, Some(v1)) => (v1.to_v2(target)?, ConversionReport::default()),
        (None, None) => return Err(TaggerError::NoTag(path.display().to_string())),
    };
    for id in &report.unavailable {
        tracing::warn!("{} has no {} equivalent and was dropped", id, target);
    }
    file.save(output.unwrap_or(path), Some(&converted), v1.as_ref(), config)?;
    Ok(report)
}

/// Set one logical field, creating a tag when the file has none
pub fn set(path: &Path, key: FieldKey, value: &str, config: &TaggerConfig) -> Result<()> {
    let file = TagFile::open(path)?;
    let mut tag = file
        .tag(config)?
        .unwrap_or_else(|| Tag::new(config.new_tag_version));
    tag.set_with(key, value, &config.policy)?;

    let v1 = match file.v1()? {
        Some(_) if config.sync_v1 => Some(V1Tag::from_v2(&tag)),
        other => other,
    };
    file.save(path, Some(&tag), v1.as_ref(), config)
}

/// Drop the ID3v1 trailer; returns whether there was one
pub fn strip_v1(path: &Path, config: &TaggerConfig) -> Result<bool> {
    let file = TagFile::open(path)?;
    if file.region.v1.is_none() {
        return Ok(false);
    }
    let tag = file.tag(config)?;
    file.save(path, tag.as_ref(), None, config)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_described() {
        assert_eq!(describe_value(&FieldValue::Text("a\0b".into())), "a / b");
        assert_eq!(describe_value(&FieldValue::Binary(vec![0; 3])), "<3 bytes>");
        assert_eq!(
            describe_value(&FieldValue::Pairs(vec![("mix".into(), "X".into())])),
            "mix: X"
        );
        assert_eq!(
            describe_value(&FieldValue::Synced(vec![("Hi".into(), 10), ("there".into(), 20)])),
            "[10] Hi [20] there"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = TagFile::open(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(TaggerError::Io(_))));
    }
}
