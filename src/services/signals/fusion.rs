//! Merge a technical opinion with an external one.

use crate::types::{FusedSignal, FusionSource, SignalAction, SignalOpinion};

/// Combine the technical and AI opinions into the final signal.
///
/// Agreement averages the confidences. On disagreement the strictly more
/// confident opinion wins, and equal confidence resolves to hold.
pub fn fuse(technical: &SignalOpinion, ai: &SignalOpinion) -> FusedSignal {
    if technical.signal == ai.signal {
        let average = ((technical.confidence as f64 + ai.confidence as f64) / 2.0).round();

        let mut reasons = vec![format!(
            "Both technical analysis and AI agree on {}",
            technical.signal.label()
        )];
        for reason in technical.reasons.iter().chain(ai.reasons.iter()) {
            if !reasons.contains(reason) {
                reasons.push(reason.clone());
            }
        }

        return FusedSignal {
            signal: technical.signal,
            confidence: (average as u8).min(100),
            reasons,
            source: FusionSource::AiTechnical,
        };
    }

    if ai.confidence > technical.confidence {
        return overridden_by(ai, "AI analysis overrides technical signal", FusionSource::Ai);
    }

    if technical.confidence > ai.confidence {
        return overridden_by(
            technical,
            "Technical analysis overrides AI signal",
            FusionSource::Technical,
        );
    }

    FusedSignal {
        signal: SignalAction::Hold,
        confidence: technical.confidence.min(100),
        reasons: vec!["Technical and AI signals conflict, defaulting to HOLD".to_string()],
        source: FusionSource::Conflict,
    }
}

fn overridden_by(winner: &SignalOpinion, note: &str, source: FusionSource) -> FusedSignal {
    let mut reasons = Vec::with_capacity(winner.reasons.len() + 1);
    reasons.push(note.to_string());
    reasons.extend(winner.reasons.iter().cloned());

    FusedSignal {
        signal: winner.signal,
        confidence: winner.confidence.min(100),
        reasons,
        source,
    }
}
