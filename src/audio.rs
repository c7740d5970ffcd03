use hound::{SampleFormat, WavReader};
use std::path::Path;

/// Stream parameters that must agree for `-c copy` concatenation of WAV parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
}

pub fn wav_format(path: &Path) -> anyhow::Result<WavFormat> {
    let spec = WavReader::open(path)?.spec();
    Ok(WavFormat {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        sample_format: spec.sample_format,
    })
}

pub fn wav_duration_seconds(path: &Path) -> anyhow::Result<f64> {
    let reader = WavReader::open(path)?;
    Ok(f64::from(reader.duration()) / f64::from(reader.spec().sample_rate))
}

/// Check that every WAV part shares the first part's stream format.
pub fn check_wav_compatible<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Result<(), String> {
    let mut expected: Option<(WavFormat, &Path)> = None;
    for path in paths {
        let format = wav_format(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        match expected {
            None => expected = Some((format, path)),
            Some((first, first_path)) if first != format => {
                return Err(format!(
                    "{} ({:?}) does not match {} ({:?})",
                    path.display(),
                    format,
                    first_path.display(),
                    first
                ));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use tempfile::tempdir;

    fn write_wav(path: &Path, sample_rate: u32, samples: usize) {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn duration_from_sample_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.wav");
        write_wav(&path, 8000, 4000);
        assert!((wav_duration_seconds(&path).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn matching_parts_are_compatible() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");
        write_wav(&a, 24000, 10);
        write_wav(&b, 24000, 20);
        assert!(check_wav_compatible([a.as_path(), b.as_path()]).is_ok());
    }

    #[test]
    fn sample_rate_mismatch_is_reported() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");
        write_wav(&a, 24000, 10);
        write_wav(&b, 44100, 10);
        let err = check_wav_compatible([a.as_path(), b.as_path()]).unwrap_err();
        assert!(err.contains("b.wav"), "{}", err);
    }

    #[test]
    fn non_wav_part_is_reported() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.wav");
        std::fs::write(&a, b"not a wav").unwrap();
        assert!(check_wav_compatible([a.as_path()]).is_err());
    }
}
