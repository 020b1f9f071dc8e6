// tcset (timecode setter for the resolve media pool)
// Copyright (C) 2025 Andrew Nissen

use regex::Regex;

/// A 6-digit time token pulled out of a clip filename, plus its rendering
/// as a start timecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTimecode {
    pub token: String,
    pub timecode: String,
}

/// Find the first `_HHMMSS_` run in a clip filename and render it as
/// `HH:MM:SS:00`. The Insta360 X4 names clips
/// `VID_YYYYMMDD_HHMMSS_XX_XXX.mp4`, so the capture time is the first
/// underscore-delimited 6-digit run. Digits are sliced positionally with
/// no range check; the frame field is always literal `00`.
pub fn extract(file_name: &str) -> Option<ExtractedTimecode> {
    let token_regex = Regex::new(r"_(\d{6})_").ok()?;
    let token = token_regex.captures(file_name)?.get(1)?.as_str();

    let timecode = format!("{}:{}:{}:00", &token[0..2], &token[2..4], &token[4..6]);

    Some(ExtractedTimecode {
        token: token.to_string(),
        timecode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_insta360_name() {
        let result = extract("VID_20240615_143022_00_001.mp4");

        assert!(result.is_some());
        let extracted = result.unwrap();
        assert_eq!(extracted.token, "143022");
        assert_eq!(extracted.timecode, "14:30:22:00");
    }

    #[test]
    fn test_extract_no_token() {
        assert!(extract("clip_final.mov").is_none());
    }

    #[test]
    fn test_extract_empty_name() {
        assert!(extract("").is_none());
    }

    #[test]
    fn test_extract_skips_date_run() {
        // The date segment is 8 digits, so the first 6-digit run between
        // underscores is the time segment.
        let extracted = extract("VID_20231201_091500_00_042.mp4").unwrap();
        assert_eq!(extracted.token, "091500");
        assert_eq!(extracted.timecode, "09:15:00:00");
    }

    #[test]
    fn test_extract_takes_first_of_two_tokens() {
        let extracted = extract("take_120000_and_235959_.mp4").unwrap();
        assert_eq!(extracted.token, "120000");
    }

    #[test]
    fn test_extract_does_not_validate_ranges() {
        // 99 hours is out of range for a clock but passes through untouched.
        let extracted = extract("X_995959_0.mp4").unwrap();
        assert_eq!(extracted.timecode, "99:59:59:00");
    }

    #[test]
    fn test_extract_requires_exactly_six_digits() {
        assert!(extract("VID_12345_clip.mp4").is_none());
        assert!(extract("VID_1234567_clip.mp4").is_none());
    }

    #[test]
    fn test_extract_frame_field_is_always_zero() {
        let extracted = extract("A_000000_B.mp4").unwrap();
        assert_eq!(extracted.timecode, "00:00:00:00");
    }
}
