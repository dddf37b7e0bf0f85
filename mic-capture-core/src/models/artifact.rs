use super::error::CaptureError;

/// The output of a successful stop: the finalized recorded audio payload.
///
/// Created once per session on finalize; immutable; ownership transfers to
/// the caller (e.g. the transcription pipeline) once returned. The core does
/// not parse or validate the audio content — the bytes are whatever encoded
/// container the negotiated mime type implies.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedArtifact {
    pub id: uuid::Uuid,
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub created_at: String,
}

impl RecordedArtifact {
    /// Assemble an artifact from chunks in delivery order.
    ///
    /// Fails only when no container type could be determined: an artifact
    /// must be tagged with its mime type to be usable downstream.
    pub fn from_chunks(chunks: Vec<Vec<u8>>, mime_type: &str) -> Result<Self, CaptureError> {
        if mime_type.is_empty() {
            return Err(CaptureError::Finalize(
                "recorder reported no container type".into(),
            ));
        }

        let total: usize = chunks.iter().map(Vec::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in chunks {
            bytes.extend_from_slice(&chunk);
        }

        Ok(Self {
            id: uuid::Uuid::new_v4(),
            bytes,
            mime_type: mime_type.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }
}

/// One snapshot of instantaneous amplitude data for live visualization.
///
/// Frames have no identity beyond "latest" — consumers always read the
/// newest value; there is no buffering or backlog.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformFrame {
    pub samples: Vec<f32>,
}

impl WaveformFrame {
    pub fn silent(bins: usize) -> Self {
        Self {
            samples: vec![0.0; bins],
        }
    }

    /// RMS level of the frame (0.0–1.0 for normalized audio).
    pub fn rms_level(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = self.samples.iter().map(|s| s * s).sum();
        (sum_sq / self.samples.len() as f32).sqrt()
    }

    /// Peak absolute level of the frame.
    pub fn peak_level(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }
}
