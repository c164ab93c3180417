//! Metadata eligibility evaluation.
//!
//! Turns a raw stored blob plus the current instant into either a
//! normalized [`EligiblePresentation`] or an [`Ineligible`] reason. The only
//! outside observation is the asset-existence probe; everything else is a
//! pure function of the inputs.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use splash_types::{Color, ScaleEasing, SplashMetadata};

use crate::timestamp::parse_instant;

/// Default fade-out length when the record does not specify one.
pub const DEFAULT_FADE_DURATION_MS: u64 = 200;

// ─────────────────────────────────────────────────────────────────────────────
// Asset Probe
// ─────────────────────────────────────────────────────────────────────────────

/// Answers whether the referenced asset is present.
pub trait AssetProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// Checks the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetProbe;

impl AssetProbe for FsAssetProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────────

/// Why a record cannot be presented right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ineligible {
    /// Nothing stored under the key.
    NoMetadata,
    /// Malformed JSON or a missing required field.
    ParseError,
    /// Status other than `READY`.
    NotReady,
    /// `startAt` or `endAt` did not parse.
    InvalidWindow,
    /// `now` is before `startAt` or after `endAt`.
    OutsideWindow,
    /// Empty `localPath` or the file is gone.
    MissingAsset,
}

impl Ineligible {
    pub fn reason(self) -> &'static str {
        match self {
            Self::NoMetadata => "no_metadata",
            Self::ParseError => "parse_error",
            Self::NotReady => "not_ready",
            Self::InvalidWindow => "invalid_window",
            Self::OutsideWindow => "outside_window",
            Self::MissingAsset => "missing_asset",
        }
    }
}

impl fmt::Display for Ineligible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Scale-in parameters. Only built when start, end and duration are all set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleIn {
    pub from: f32,
    pub to: f32,
    /// 0 means "jump to the end scale without animating".
    pub duration_ms: u64,
    /// Left unresolved; see [`ScaleIn::easing`].
    pub easing: Option<ScaleEasing>,
}

impl ScaleIn {
    /// Easing to apply, defaulting to ease-in-out.
    pub fn easing(&self) -> ScaleEasing {
        self.easing.unwrap_or_default()
    }
}

/// Everything the coordinator needs to run one session.
#[derive(Debug, Clone, PartialEq)]
pub struct EligiblePresentation {
    pub asset_path: PathBuf,
    pub background: Color,
    pub enable_fade: bool,
    pub fade_duration_ms: u64,
    pub scale: Option<ScaleIn>,
    pub min_duration_ms: u64,
    /// 0 means no cap.
    pub max_duration_ms: u64,
}

impl EligiblePresentation {
    /// Whether hiding runs a fade before finalizing.
    pub fn fades_out(&self) -> bool {
        self.enable_fade && self.fade_duration_ms > 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluation
// ─────────────────────────────────────────────────────────────────────────────

/// Evaluate against the local filesystem.
pub fn evaluate(raw: Option<&str>, now: DateTime<Utc>) -> Result<EligiblePresentation, Ineligible> {
    evaluate_with(raw, now, &FsAssetProbe)
}

/// Evaluate with an explicit asset probe.
pub fn evaluate_with(
    raw: Option<&str>,
    now: DateTime<Utc>,
    probe: &dyn AssetProbe,
) -> Result<EligiblePresentation, Ineligible> {
    let raw = raw.filter(|r| !r.trim().is_empty()).ok_or(Ineligible::NoMetadata)?;
    let meta: SplashMetadata = serde_json::from_str(raw).map_err(|_| Ineligible::ParseError)?;
    evaluate_metadata(&meta, now, probe)
}

/// Evaluate an already-parsed record.
pub fn evaluate_metadata(
    meta: &SplashMetadata,
    now: DateTime<Utc>,
    probe: &dyn AssetProbe,
) -> Result<EligiblePresentation, Ineligible> {
    if !meta.is_ready() {
        return Err(Ineligible::NotReady);
    }

    let (Some(start_at), Some(end_at), Some(local_path)) =
        (&meta.start_at, &meta.end_at, &meta.local_path)
    else {
        return Err(Ineligible::ParseError);
    };

    let start = parse_instant(start_at).ok_or(Ineligible::InvalidWindow)?;
    let end = parse_instant(end_at).ok_or(Ineligible::InvalidWindow)?;
    if now < start || now > end {
        return Err(Ineligible::OutsideWindow);
    }

    if local_path.trim().is_empty() {
        return Err(Ineligible::MissingAsset);
    }
    let asset_path = PathBuf::from(local_path);
    if !probe.exists(&asset_path) {
        return Err(Ineligible::MissingAsset);
    }

    let background = meta
        .background_color
        .as_deref()
        .and_then(Color::parse)
        .unwrap_or_default();

    Ok(EligiblePresentation {
        asset_path,
        background,
        enable_fade: meta.enable_fade.unwrap_or(true),
        fade_duration_ms: millis_or(meta.fade_duration_ms, DEFAULT_FADE_DURATION_MS),
        scale: scale_in(meta),
        min_duration_ms: millis_or(meta.min_duration_ms, 0),
        max_duration_ms: millis_or(meta.max_duration_ms, 0),
    })
}

fn scale_in(meta: &SplashMetadata) -> Option<ScaleIn> {
    let from = meta.scale_start.filter(|v| v.is_finite())?;
    let to = meta.scale_end.filter(|v| v.is_finite())?;
    let duration = meta.scale_duration_ms?;

    Some(ScaleIn {
        from: from as f32,
        to: to as f32,
        duration_ms: millis_or(Some(duration), 0),
        easing: meta.scale_easing.as_deref().and_then(ScaleEasing::from_name),
    })
}

/// Convert a wire number to whole milliseconds. Negative values clamp to 0.
fn millis_or(value: Option<f64>, default: u64) -> u64 {
    match value {
        Some(v) if v.is_finite() => v.max(0.0) as u64,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    struct FakeProbe(HashSet<PathBuf>);

    impl FakeProbe {
        fn with(paths: &[&str]) -> Self {
            Self(paths.iter().map(PathBuf::from).collect())
        }
    }

    impl AssetProbe for FakeProbe {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn now() -> DateTime<Utc> {
        parse_instant("2025-06-15T12:00:00Z").unwrap()
    }

    fn iso(dt: DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    fn ready_json(extra: &str) -> String {
        format!(
            r#"{{"status":"READY","startAt":"{}","endAt":"{}","localPath":"/tmp/a.png"{}}}"#,
            iso(now() - Duration::hours(1)),
            iso(now() + Duration::hours(1)),
            extra
        )
    }

    fn eval(raw: &str) -> Result<EligiblePresentation, Ineligible> {
        evaluate_with(Some(raw), now(), &FakeProbe::with(&["/tmp/a.png"]))
    }

    #[test]
    fn test_ready_record_with_defaults() {
        let p = eval(&ready_json("")).unwrap();
        assert_eq!(p.asset_path, PathBuf::from("/tmp/a.png"));
        assert_eq!(p.background, Color::WHITE);
        assert!(p.enable_fade);
        assert_eq!(p.fade_duration_ms, 200);
        assert!(p.fades_out());
        assert_eq!(p.scale, None);
        assert_eq!(p.min_duration_ms, 0);
        assert_eq!(p.max_duration_ms, 0);
    }

    #[test]
    fn test_presentation_fields_are_normalized() {
        let p = eval(&ready_json(
            r##","backgroundColor":"#102030","enableFade":false,"fadeDurationMs":0,
                "minDurationMs":1000,"maxDurationMs":5000.0"##,
        ))
        .unwrap();
        assert_eq!(p.background, Color::rgb(0x10, 0x20, 0x30));
        assert!(!p.fades_out());
        assert_eq!(p.min_duration_ms, 1000);
        assert_eq!(p.max_duration_ms, 5000);
    }

    #[test]
    fn test_invalid_color_falls_back_to_white() {
        let p = eval(&ready_json(r#","backgroundColor":"not-a-color""#)).unwrap();
        assert_eq!(p.background, Color::WHITE);
    }

    #[test]
    fn test_non_ready_status_is_ineligible_in_any_window() {
        let probe = FakeProbe::with(&["/tmp/a.png"]);
        let outside = [
            now(),
            now() - Duration::days(2),
            now() + Duration::days(2),
        ];
        for status in ["EMPTY", "ERROR", "DRAFT"] {
            let raw = ready_json("").replace("READY", status);
            for at in outside {
                assert_eq!(
                    evaluate_with(Some(&raw), at, &probe),
                    Err(Ineligible::NotReady),
                    "status {status} at {at}"
                );
            }
        }
    }

    #[test]
    fn test_wrong_typed_optional_fields_take_defaults() {
        let cases = [
            r#","backgroundColor":123"#,
            r#","fadeDurationMs":"300""#,
            r#","scaleEasing":5"#,
            r#","enableFade":"false""#,
            r#","minDurationMs":"1000","maxDurationMs":true"#,
        ];
        let defaults = eval(&ready_json("")).unwrap();
        for extra in cases {
            assert_eq!(eval(&ready_json(extra)), Ok(defaults.clone()), "{extra}");
        }

        let p = eval(&ready_json(
            r#","scaleStart":1.0,"scaleEnd":1.2,"scaleDurationMs":300,"scaleEasing":5"#,
        ))
        .unwrap();
        assert_eq!(p.scale.unwrap().easing(), ScaleEasing::EaseInOut);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let p = eval(&ready_json(
            r#","fadeDurationMs":18446744073709551615,"maxDurationMs":1e300"#,
        ))
        .unwrap();
        assert_eq!(p.fade_duration_ms, u64::MAX);
        assert_eq!(p.max_duration_ms, u64::MAX);
    }

    #[test]
    fn test_window_bounds() {
        let start = now() - Duration::minutes(5);
        let end = now() + Duration::minutes(5);
        let raw = format!(
            r#"{{"status":"READY","startAt":"{}","endAt":"{}","localPath":"/tmp/a.png"}}"#,
            iso(start),
            iso(end)
        );
        let probe = FakeProbe::with(&["/tmp/a.png"]);

        assert!(evaluate_with(Some(&raw), now(), &probe).is_ok());
        assert!(evaluate_with(Some(&raw), start, &probe).is_ok());
        assert!(evaluate_with(Some(&raw), end, &probe).is_ok());
        assert_eq!(
            evaluate_with(Some(&raw), start - Duration::milliseconds(1), &probe),
            Err(Ineligible::OutsideWindow)
        );
        assert_eq!(
            evaluate_with(Some(&raw), end + Duration::milliseconds(1), &probe),
            Err(Ineligible::OutsideWindow)
        );
    }

    #[test]
    fn test_unparsable_dates() {
        let raw = r#"{"status":"READY","startAt":"soon","endAt":"2030-01-01T00:00:00Z","localPath":"/tmp/a.png"}"#;
        assert_eq!(eval(raw), Err(Ineligible::InvalidWindow));
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(eval("{not json"), Err(Ineligible::ParseError));
        assert_eq!(eval(r#"{"startAt":"x"}"#), Err(Ineligible::ParseError));
        assert_eq!(
            eval(r#"{"status":"READY","localPath":"/tmp/a.png"}"#),
            Err(Ineligible::ParseError)
        );
        assert_eq!(
            evaluate_with(None, now(), &FsAssetProbe),
            Err(Ineligible::NoMetadata)
        );
    }

    #[test]
    fn test_missing_asset() {
        let raw = ready_json("").replace("/tmp/a.png", "/tmp/gone.png");
        assert_eq!(eval(&raw), Err(Ineligible::MissingAsset));

        let raw = ready_json("").replace("/tmp/a.png", "");
        assert_eq!(eval(&raw), Err(Ineligible::MissingAsset));
    }

    #[test]
    fn test_scale_requires_all_three_fields() {
        let p = eval(&ready_json(r#","scaleStart":1.0,"scaleEnd":1.2"#)).unwrap();
        assert_eq!(p.scale, None);

        let p = eval(&ready_json(
            r#","scaleStart":1.0,"scaleEnd":1.2,"scaleDurationMs":400,"scaleEasing":"easeIn""#,
        ))
        .unwrap();
        let scale = p.scale.unwrap();
        assert_eq!(scale.from, 1.0);
        assert_eq!(scale.to, 1.2);
        assert_eq!(scale.duration_ms, 400);
        assert_eq!(scale.easing(), ScaleEasing::EaseIn);
    }

    #[test]
    fn test_unknown_easing_resolves_on_use() {
        let p = eval(&ready_json(
            r#","scaleStart":0.9,"scaleEnd":1.0,"scaleDurationMs":0,"scaleEasing":"bounce""#,
        ))
        .unwrap();
        let scale = p.scale.unwrap();
        assert_eq!(scale.easing, None);
        assert_eq!(scale.easing(), ScaleEasing::EaseInOut);
        assert_eq!(scale.duration_ms, 0);
    }

    #[test]
    fn test_same_inputs_same_result() {
        let raw = ready_json(r#","minDurationMs":250"#);
        assert_eq!(eval(&raw), eval(&raw));
    }

    #[test]
    fn test_filesystem_probe() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("splash.png");
        std::fs::write(&asset, b"png").unwrap();

        let raw = ready_json("").replace("/tmp/a.png", &asset.to_string_lossy());
        assert!(evaluate(Some(&raw), now()).is_ok());

        std::fs::remove_file(&asset).unwrap();
        assert_eq!(evaluate(Some(&raw), now()), Err(Ineligible::MissingAsset));
    }
}
