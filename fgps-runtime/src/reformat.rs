//! Conversion of receiver sentences into the FGPS-2 sentence layout.
//!
//! The radio expects every numeric field at a fixed width and precision,
//! zero padded on the left. Receivers are free to send any precision they
//! like, so positioning sentences are rebuilt field by field. Satellite
//! sentences are forwarded as received.

use std::{borrow::Cow, fmt};

use crate::nmea::SentenceKind;

/// Trailing differential GPS fields (age and station) of an FGPS-2 GGA sentence.
const GGA_DGPS_PLACEHOLDER: &str = "000.0,0000";

/// Speed and course reported when the receiver leaves them empty.
const RMC_MOTION_DEFAULT: &str = "0.0";

/// Minimum number of RMC fields, including the tag, up to the date field.
const RMC_MIN_FIELDS: usize = 10;

/// Sentence could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReformatError {
    /// A field required for the output is absent.
    MissingField { kind: SentenceKind, index: usize },
    /// A field that must be numeric is not a finite number.
    Numeric {
        kind: SentenceKind,
        index: usize,
        value: String,
    },
}

impl fmt::Display for ReformatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { kind, index } => {
                write!(f, "{} is missing field {}", kind, index)
            }
            Self::Numeric { kind, index, value } => {
                write!(f, "{} field {} is not a number: '{}'", kind, index, value)
            }
        }
    }
}

impl std::error::Error for ReformatError {}

/// Rebuild the payload of a recognized sentence for the radio.
///
/// Returns `Ok(None)` when the sentence lacks the fields the radio needs,
/// which is normal while the receiver has no fix. Pass-through kinds borrow
/// the received payload.
pub fn reformat<'a>(
    kind: SentenceKind,
    payload: &'a str,
    fields: &[&str],
) -> Result<Option<Cow<'a, str>>, ReformatError> {
    let fields = Fields { kind, fields };

    match kind {
        SentenceKind::Rmc => Ok(reformat_rmc(&fields)?.map(Cow::Owned)),
        SentenceKind::Gga => Ok(reformat_gga(&fields)?.map(Cow::Owned)),
        SentenceKind::Gsv | SentenceKind::Gsa => Ok(Some(Cow::Borrowed(payload))),
    }
}

fn reformat_rmc(fields: &Fields) -> Result<Option<String>, ReformatError> {
    if fields.len() < RMC_MIN_FIELDS || !fields.present(1..=6) {
        return Ok(None);
    }

    let sentence = [
        SentenceKind::Rmc.tag().to_owned(),
        fields.fixed(1, 10, 3)?,
        fields.text(2)?.to_owned(),
        fields.fixed(3, 9, 4)?,
        fields.text(4)?.to_owned(),
        fields.fixed(5, 10, 4)?,
        fields.text(6)?.to_owned(),
        fields.fixed_or(7, RMC_MOTION_DEFAULT, 7, 2)?,
        fields.fixed_or(8, RMC_MOTION_DEFAULT, 6, 2)?,
        fields.text(9)?.to_owned(),
        String::new(),
        String::new(),
    ];

    Ok(Some(sentence.join(",")))
}

fn reformat_gga(fields: &Fields) -> Result<Option<String>, ReformatError> {
    if !fields.present(1..=7) {
        return Ok(None);
    }

    let sentence = [
        SentenceKind::Gga.tag().to_owned(),
        fields.fixed(1, 10, 3)?,
        fields.fixed(2, 9, 4)?,
        fields.text(3)?.to_owned(),
        fields.fixed(4, 10, 4)?,
        fields.text(5)?.to_owned(),
        fields.text(6)?.to_owned(),
        fields.text(7)?.to_owned(),
        fields.fixed(8, 4, 1)?,
        fields.fixed(9, 7, 1)?,
        fields.text(10)?.to_owned(),
        fields.fixed(11, 6, 1)?,
        fields.text(12)?.to_owned(),
        GGA_DGPS_PLACEHOLDER.to_owned(),
    ];

    Ok(Some(sentence.join(",")))
}

/// Format a number in fixed point, zero padded on the left to `width`.
///
/// The width includes the sign and the decimal point. Values that need more
/// room are not truncated.
///
/// # Example
///
/// ```
/// use fgps::reformat::fixed_point;
///
/// assert_eq!(fixed_point(123519.0, 10, 3), "123519.000");
/// assert_eq!(fixed_point(-25.669, 6, 1), "-025.7");
/// ```
pub fn fixed_point(value: f64, width: usize, precision: usize) -> String {
    format!("{:0width$.precision$}", value, width = width, precision = precision)
}

struct Fields<'a> {
    kind: SentenceKind,
    fields: &'a [&'a str],
}

impl<'a> Fields<'a> {
    #[inline]
    fn len(&self) -> usize {
        self.fields.len()
    }

    /// All fields in `range` exist and are non-empty.
    fn present(&self, mut range: std::ops::RangeInclusive<usize>) -> bool {
        range.all(|index| self.fields.get(index).map_or(false, |f| !f.is_empty()))
    }

    fn text(&self, index: usize) -> Result<&'a str, ReformatError> {
        self.fields
            .get(index)
            .copied()
            .ok_or(ReformatError::MissingField {
                kind: self.kind,
                index,
            })
    }

    fn number(&self, index: usize, value: &str) -> Result<f64, ReformatError> {
        match value.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(number),
            _ => Err(ReformatError::Numeric {
                kind: self.kind,
                index,
                value: value.to_owned(),
            }),
        }
    }

    fn fixed(&self, index: usize, width: usize, precision: usize) -> Result<String, ReformatError> {
        let number = self.number(index, self.text(index)?)?;
        Ok(fixed_point(number, width, precision))
    }

    fn fixed_or(
        &self,
        index: usize,
        default: &str,
        width: usize,
        precision: usize,
    ) -> Result<String, ReformatError> {
        let value = match self.text(index)? {
            "" => default,
            value => value,
        };

        let number = self.number(index, value)?;
        Ok(fixed_point(number, width, precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::nmea::parse;

    fn run(payload: &str) -> Result<Option<String>, ReformatError> {
        let fields = parse(payload);
        let kind = SentenceKind::from_tag(fields[0]).unwrap();
        reformat(kind, payload, &fields).map(|out| out.map(Cow::into_owned))
    }

    #[test]
    fn fixed_point_widths() {
        assert_eq!(fixed_point(123519.0, 10, 3), "123519.000");
        assert_eq!(fixed_point(4807.038, 9, 4), "4807.0380");
        assert_eq!(fixed_point(1131.0, 10, 4), "01131.0000");
        assert_eq!(fixed_point(22.4, 7, 2), "0022.40");
        assert_eq!(fixed_point(84.4, 6, 2), "084.40");
        assert_eq!(fixed_point(0.9, 4, 1), "00.9");
        assert_eq!(fixed_point(-1.5, 10, 3), "-00001.500");
    }

    #[test]
    fn fixed_point_does_not_truncate() {
        assert_eq!(fixed_point(12345.5, 4, 1), "12345.5");
    }

    #[test]
    fn rmc_classic() {
        let output = run("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W");

        assert_eq!(
            output,
            Ok(Some(
                "GPRMC,123519.000,A,4807.0380,N,01131.0000,E,0022.40,084.40,230394,,".to_owned()
            ))
        );
    }

    #[test]
    fn rmc_time_field_width() {
        let output = run("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W")
            .unwrap()
            .unwrap();
        let time = parse(&output)[1].to_owned();

        assert_eq!(time.len(), 10);
        assert_eq!(time.split('.').nth(1).unwrap().len(), 3);
    }

    #[test]
    fn rmc_decimal_inputs() {
        assert_eq!(
            run("GPRMC,092750.000,A,5321.6802,N,00630.3372,W,0.02,31.66,280511,,,A"),
            Ok(Some(
                "GPRMC,092750.000,A,5321.6802,N,00630.3372,W,0000.02,031.66,280511,,".to_owned()
            ))
        );
        assert_eq!(
            run("GPRMC,001031.00,A,3352.1234,S,15112.5678,E,123.456,359.999,010124,,,D"),
            Ok(Some(
                "GPRMC,001031.000,A,3352.1234,S,15112.5678,E,0123.46,360.00,010124,,".to_owned()
            ))
        );
    }

    #[test]
    fn rmc_default_speed_and_course() {
        assert_eq!(
            run("GPRMC,225446.33,A,4916.45,N,12311.12,W,,,191194,,"),
            Ok(Some(
                "GPRMC,225446.330,A,4916.4500,N,12311.1200,W,0000.00,000.00,191194,,".to_owned()
            ))
        );
    }

    #[test]
    fn rmc_void_still_reformatted() {
        let output = run("GPRMC,123519,V,4807.038,N,01131.000,E,,,230394,,")
            .unwrap()
            .unwrap();

        assert!(output.starts_with("GPRMC,123519.000,V,"));
    }

    #[test]
    fn rmc_incomplete() {
        assert_eq!(run("GPRMC,,V,,,,,,,,,"), Ok(None));
        assert_eq!(run("GPRMC,123519,V,,,,,,,,,"), Ok(None));
        assert_eq!(run("GPRMC,123519,A,4807.038,N,01131.000,,,,230394,,"), Ok(None));
        assert_eq!(run("GPRMC"), Ok(None));
    }

    #[test]
    fn rmc_short_sentence() {
        assert_eq!(run("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4"), Ok(None));
    }

    #[test]
    fn rmc_numeric_error() {
        assert_eq!(
            run("GPRMC,12h519,A,4807.038,N,01131.000,E,022.4,084.4,230394,,"),
            Err(ReformatError::Numeric {
                kind: SentenceKind::Rmc,
                index: 1,
                value: "12h519".to_owned(),
            })
        );
        assert_eq!(
            run("GPRMC,123519,A,4807.038,N,01131.000,E,fast,084.4,230394,,"),
            Err(ReformatError::Numeric {
                kind: SentenceKind::Rmc,
                index: 7,
                value: "fast".to_owned(),
            })
        );
    }

    #[test]
    fn rmc_rejects_non_finite() {
        assert!(matches!(
            run("GPRMC,123519,A,inf,N,01131.000,E,,,230394,,"),
            Err(ReformatError::Numeric { index: 3, .. })
        ));
        assert!(matches!(
            run("GPRMC,123519,A,4807.038,N,NaN,E,,,230394,,"),
            Err(ReformatError::Numeric { index: 5, .. })
        ));
    }

    #[test]
    fn gga_classic() {
        assert_eq!(
            run("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"),
            Ok(Some(
                "GPGGA,123519.000,4807.0380,N,01131.0000,E,1,08,00.9,00545.4,M,0046.9,M,000.0,0000"
                    .to_owned()
            ))
        );
    }

    #[test]
    fn gga_precision_inputs() {
        assert_eq!(
            run("GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,"),
            Ok(Some(
                "GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,01.0,00061.7,M,0055.2,M,000.0,0000"
                    .to_owned()
            ))
        );
        assert_eq!(
            run("GPGGA,172814.0,3723.46587704,N,12202.26957864,W,2,6,1.2,18.893,M,-25.669,M,2.0,0031"),
            Ok(Some(
                "GPGGA,172814.000,3723.4659,N,12202.2696,W,2,6,01.2,00018.9,M,-025.7,M,000.0,0000"
                    .to_owned()
            ))
        );
    }

    #[test]
    fn gga_incomplete() {
        for index in 1..=7 {
            let mut fields =
                parse("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,");
            fields[index] = "";
            let payload = fields.join(",");

            assert_eq!(run(&payload), Ok(None), "field {} empty", index);
        }

        assert_eq!(run("GPGGA,123519,4807.038,N"), Ok(None));
    }

    #[test]
    fn gga_missing_trailing_fields() {
        assert_eq!(
            run("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4"),
            Err(ReformatError::MissingField {
                kind: SentenceKind::Gga,
                index: 10,
            })
        );
    }

    #[test]
    fn gga_empty_dilution() {
        assert_eq!(
            run("GPGGA,123519,4807.038,N,01131.000,E,1,08,,545.4,M,46.9,M,,"),
            Err(ReformatError::Numeric {
                kind: SentenceKind::Gga,
                index: 8,
                value: String::new(),
            })
        );
    }

    #[test]
    fn satellite_sentences_pass_through() {
        let gsv = "GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00";
        let gsa = "GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1";

        let fields = parse(gsv);
        assert_eq!(
            reformat(SentenceKind::Gsv, gsv, &fields),
            Ok(Some(Cow::Borrowed(gsv)))
        );

        let fields = parse(gsa);
        assert_eq!(
            reformat(SentenceKind::Gsa, gsa, &fields),
            Ok(Some(Cow::Borrowed(gsa)))
        );
    }

    #[test]
    fn reformat_error_display() {
        let error = ReformatError::Numeric {
            kind: SentenceKind::Gga,
            index: 8,
            value: "x".to_owned(),
        };
        assert_eq!(error.to_string(), "GPGGA field 8 is not a number: 'x'");
    }
}
