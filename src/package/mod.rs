//! Interactive-transcript package building.
//!
//! Bundles the episode audio and captions into an H5P.Transcript archive:
//! a fixed template tree, two patched metadata documents, and a zip of the
//! result. The whole step is best-effort; an episode is still delivered
//! when packaging fails.

use crate::error::{KringkastError, Result};
use serde_json::json;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds interactive-transcript packages from a template directory.
pub struct PackageBuilder {
    template_dir: PathBuf,
    scratch_dir: PathBuf,
}

impl PackageBuilder {
    pub fn new(template_dir: PathBuf, scratch_dir: PathBuf) -> Self {
        Self {
            template_dir,
            scratch_dir,
        }
    }

    /// Build a package archive; any failure is logged and yields `None`.
    pub fn build(
        &self,
        audio_path: &Path,
        caption_path: &Path,
        language_code: &str,
        title: &str,
    ) -> Option<PathBuf> {
        match self.try_build(audio_path, caption_path, language_code, title) {
            Ok(path) => {
                info!("Generated transcript package: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Package build failed, episode continues without it: {}", e);
                None
            }
        }
    }

    fn try_build(
        &self,
        audio_path: &Path,
        caption_path: &Path,
        language_code: &str,
        title: &str,
    ) -> Result<PathBuf> {
        if !self.template_dir.is_dir() {
            return Err(KringkastError::Package(format!(
                "Template directory not found: {}",
                self.template_dir.display()
            )));
        }

        let staging = tempfile::tempdir()?;
        let root = staging.path().join("package");
        copy_tree(&self.template_dir, &root)?;

        // Unique internal identifiers for the media references.
        let audio_id = format!("audio-{}", short_id());
        let caption_id = format!("file-{}", short_id());
        let subcontent_id = Uuid::new_v4().to_string();

        let audio_filename = format!("{}.mp3", audio_id);
        let audio_dest = root.join("content").join("audios").join(&audio_filename);
        if let Some(parent) = audio_dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(audio_path, &audio_dest)?;

        let caption_filename = format!("{}.vtt", caption_id);
        std::fs::copy(caption_path, root.join("content").join(&caption_filename))?;

        patch_package_descriptor(&root.join("h5p.json"), title)?;

        let content = content_descriptor(
            &audio_filename,
            &caption_filename,
            language_code,
            &subcontent_id,
        );
        std::fs::write(
            root.join("content").join("content.json"),
            serde_json::to_string(&content)?,
        )?;

        std::fs::create_dir_all(&self.scratch_dir)?;
        let archive_path = self
            .scratch_dir
            .join(format!("podcast_{}.h5p", Uuid::new_v4().simple()));
        zip_tree(&root, &archive_path)?;

        Ok(archive_path)
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Patch the top-level package descriptor with the episode title.
fn patch_package_descriptor(path: &Path, title: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| KringkastError::Package(format!("Cannot read {}: {}", path.display(), e)))?;
    let mut descriptor: serde_json::Value = serde_json::from_str(&content)?;

    descriptor["title"] = json!(title);
    descriptor["extraTitle"] = json!(title);

    std::fs::write(path, serde_json::to_string_pretty(&descriptor)?)?;
    Ok(())
}

/// The content descriptor referencing the packaged audio and captions.
fn content_descriptor(
    audio_filename: &str,
    caption_filename: &str,
    language_code: &str,
    subcontent_id: &str,
) -> serde_json::Value {
    json!({
        "mediumGroup": {
            "medium": {
                "params": {
                    "playerMode": "minimalistic",
                    "fitToWrapper": false,
                    "controls": true,
                    "autoplay": false,
                    "playAudio": "Play audio",
                    "pauseAudio": "Pause audio",
                    "contentName": "Audio",
                    "audioNotSupported": "Your browser does not support this audio",
                    "files": [
                        {
                            "path": format!("audios/{}", audio_filename),
                            "mime": "audio/mpeg",
                            "copyright": {"license": "U"}
                        }
                    ]
                },
                "library": "H5P.Audio 1.5",
                "metadata": {
                    "contentType": "Audio",
                    "license": "U",
                    "title": "Untitled Audio",
                    "authors": [],
                    "changes": [],
                    "extraTitle": "Untitled Audio"
                },
                "subContentId": subcontent_id
            }
        },
        "transcriptFiles": [
            {
                "label": language_code,
                "languageCode": language_code,
                "transcriptFile": {
                    "path": caption_filename,
                    "mime": "text/vtt",
                    "copyright": {"license": "U"}
                }
            }
        ],
        "behaviour": {
            "maxLines": 10,
            "showOnLoad": true
        },
        "chapters": {
            "useIVBookmarks": false
        },
        "l10n": {
            "noMedium": "No medium was assigned to the transcript.",
            "noTranscript": "No transcript was provided.",
            "troubleWebVTT": "There seems to be something wrong with the WebVTT file. Please consult the browser's development console for more information.",
            "chapterMarks": "Chapter marks",
            "unnamedOption": "Unnamed option"
        },
        "a11y": {
            "buttonVisible": "Hide transcript. Currently visible.",
            "buttonInvisible": "Show transcript. Currently not visible.",
            "buttonAutoscrollActive": "Turn off autoscroll. Currently active.",
            "buttonAutoscrollInactive": "Turn on autoscroll. Currently not active.",
            "buttonAutoscrollDisabled": "Autoscroll option disabled.",
            "buttonInteractive": "Switch to plaintext view",
            "buttonPlaintext": "Switch to interactive transcript view.",
            "buttonModeDisabled": "Mode switching disabled.",
            "buttonTimeActive": "Hide start time. Currently shown.",
            "buttonTimeInactive": "Show start time. Currently not shown.",
            "buttonTimeDisabled": "Start time option disabled.",
            "buttonLineBreakActive": "Hide line breaks. Currently shown.",
            "buttonLineBreakInactive": "Show line breaks. Currently not shown.",
            "buttonLineBreakDisabled": "Line break option disabled.",
            "buttonChapterMarksOpen": "Open chapter marks",
            "buttonChapterMarksClose": "Close chapter marks",
            "buttonChapterMarksDisabled": "Chapter marks disabled.",
            "interactiveTranscript": "Interactive transcript",
            "selectField": "Select what transcript to display.",
            "selectFieldDisabled": "Select field disabled.",
            "enterToHighlight": "Enter a query to highlight relevant text.",
            "searchboxDisabled": "Search box disabled.",
            "close": "Close"
        }
    })
}

/// Recursively copy a directory tree.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

/// Zip a directory tree into a single archive, paths relative to `root`.
fn zip_tree(root: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    add_dir_to_zip(&mut writer, root, root, options)?;

    writer
        .finish()
        .map_err(|e| KringkastError::Package(format!("Cannot finalize archive: {}", e)))?;
    Ok(())
}

fn add_dir_to_zip(
    writer: &mut ZipWriter<File>,
    root: &Path,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            add_dir_to_zip(writer, root, &path, options)?;
            continue;
        }

        let name = path
            .strip_prefix(root)
            .map_err(|e| KringkastError::Package(e.to_string()))?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        writer
            .start_file(name.clone(), options)
            .map_err(|e| KringkastError::Package(format!("Cannot add {}: {}", name, e)))?;
        let mut contents = Vec::new();
        File::open(&path)?.read_to_end(&mut contents)?;
        writer.write_all(&contents)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    /// Minimal template tree matching the real one's shape.
    fn write_template(dir: &Path) {
        std::fs::create_dir_all(dir.join("content").join("audios")).unwrap();
        std::fs::write(
            dir.join("h5p.json"),
            r#"{"title": "placeholder", "extraTitle": "placeholder", "mainLibrary": "H5P.Transcript"}"#,
        )
        .unwrap();
        std::fs::write(dir.join("content").join("content.json"), "{}").unwrap();
    }

    fn episode_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let audio = dir.join("episode.mp3");
        let captions = dir.join("episode.vtt");
        std::fs::write(&audio, b"mp3-bytes").unwrap();
        std::fs::write(&captions, "WEBVTT\n\n").unwrap();
        (audio, captions)
    }

    #[test]
    fn test_build_produces_archive_with_patched_title() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template");
        write_template(&template);
        let (audio, captions) = episode_inputs(dir.path());

        let builder = PackageBuilder::new(template, dir.path().join("scratch"));
        let archive_path = builder
            .build(&audio, &captions, "en", "My Episode")
            .expect("package should build");
        assert!(archive_path.exists());

        let mut archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();

        let mut descriptor = String::new();
        archive
            .by_name("h5p.json")
            .unwrap()
            .read_to_string(&mut descriptor)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&descriptor).unwrap();
        assert_eq!(parsed["title"], "My Episode");
        assert_eq!(parsed["extraTitle"], "My Episode");

        let mut content = String::new();
        archive
            .by_name("content/content.json")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["transcriptFiles"][0]["languageCode"], "en");
        assert!(parsed["mediumGroup"]["medium"]["params"]["files"][0]["path"]
            .as_str()
            .unwrap()
            .starts_with("audios/audio-"));
    }

    #[test]
    fn test_missing_template_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let (audio, captions) = episode_inputs(dir.path());

        let builder = PackageBuilder::new(
            dir.path().join("no-template"),
            dir.path().join("scratch"),
        );
        assert!(builder.build(&audio, &captions, "en", "Title").is_none());
    }

    #[test]
    fn test_missing_audio_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template");
        write_template(&template);

        let builder = PackageBuilder::new(template, dir.path().join("scratch"));
        let result = builder.build(
            Path::new("/nonexistent/audio.mp3"),
            Path::new("/nonexistent/captions.vtt"),
            "en",
            "Title",
        );
        assert!(result.is_none());
    }
}
