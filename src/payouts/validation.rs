//! Bank detail validation: IBAN (structure plus mod-97 checksum), optional
//! BIC, and the KYC holder-name check.

use super::error::PayoutError;

/// Strip all whitespace and uppercase; validation and storage both use the
/// normalized form.
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Structural check and ISO 13616 mod-97 checksum over the normalized IBAN.
pub fn validate_iban(iban: &str) -> Result<(), PayoutError> {
    let len = iban.len();
    if !(15..=34).contains(&len) {
        return Err(PayoutError::InvalidIban);
    }
    if !iban.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(PayoutError::InvalidIban);
    }

    // Move the country code and check digits to the end, expand letters to
    // two-digit values, and take the remainder digit by digit so the
    // intermediate number never overflows.
    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);
    let mut remainder: u64 = 0;
    for c in rearranged.chars() {
        if let Some(d) = c.to_digit(10) {
            remainder = (remainder * 10 + d as u64) % 97;
        } else {
            let v = (c as u64) - ('A' as u64) + 10;
            remainder = (remainder * 100 + v) % 97;
        }
    }
    if remainder != 1 {
        return Err(PayoutError::InvalidIban);
    }
    Ok(())
}

/// BIC is optional; when present it must be 8 or 11 characters, bank and
/// country codes alphabetic, the rest alphanumeric.
pub fn validate_bic(bic: Option<&str>) -> Result<(), PayoutError> {
    let Some(bic) = bic else {
        return Ok(());
    };
    let bic = bic.trim().to_uppercase();
    if bic.is_empty() {
        return Ok(());
    }
    if bic.len() != 8 && bic.len() != 11 {
        return Err(PayoutError::InvalidBic);
    }
    let bytes = bic.as_bytes();
    let alpha = |b: u8| b.is_ascii_uppercase();
    let alnum = |b: u8| b.is_ascii_uppercase() || b.is_ascii_digit();
    if !bytes[..6].iter().all(|&b| alpha(b)) || !bytes[6..].iter().all(|&b| alnum(b)) {
        return Err(PayoutError::InvalidBic);
    }
    Ok(())
}

/// The declared holder must relate to the verified identity name. Users
/// without a verified name pass (KYC not yet completed); otherwise one name
/// must contain the other, case-insensitively.
pub fn holder_matches_kyc(holder_name: &str, kyc_name: Option<&str>) -> bool {
    let Some(kyc_name) = kyc_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return true;
    };
    let holder = holder_name.trim().to_lowercase();
    let kyc = kyc_name.to_lowercase();
    holder.contains(&kyc) || kyc.contains(&holder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_spaces_and_uppercases() {
        assert_eq!(
            normalize_iban("de44 5001 0517 5407 3249 31"),
            "DE44500105175407324931"
        );
    }

    #[test]
    fn valid_ibans_pass_the_checksum() {
        for iban in [
            "DE44500105175407324931",
            "GB29NWBK60161331926819",
            "FR1420041010050500013M02606",
        ] {
            validate_iban(iban).expect(iban);
        }
    }

    #[test]
    fn tampered_iban_fails_the_checksum() {
        // One digit changed from the valid DE IBAN.
        assert!(matches!(
            validate_iban("DE44500105175407324932"),
            Err(PayoutError::InvalidIban)
        ));
    }

    #[test]
    fn structural_iban_rejections() {
        assert!(validate_iban("DE4450010").is_err()); // too short
        assert!(validate_iban("de44500105175407324931").is_err()); // not normalized
        assert!(validate_iban("DE44 500105175407324931").is_err()); // whitespace
    }

    #[test]
    fn bic_rules() {
        assert!(validate_bic(None).is_ok());
        assert!(validate_bic(Some("")).is_ok());
        assert!(validate_bic(Some("DEUTDEFF")).is_ok());
        assert!(validate_bic(Some("DEUTDEFF500")).is_ok());
        assert!(validate_bic(Some("deutdeff")).is_ok()); // normalized before checking
        assert!(validate_bic(Some("DEUTDEFF50")).is_err()); // 10 chars
        assert!(validate_bic(Some("DEU1DEFF")).is_err()); // digit in bank code
    }

    #[test]
    fn holder_check_is_substring_either_way() {
        assert!(holder_matches_kyc("Ada Lovelace", Some("ada lovelace")));
        assert!(holder_matches_kyc("Ada Lovelace", Some("Lovelace")));
        assert!(holder_matches_kyc("Lovelace", Some("Ada Lovelace")));
        assert!(!holder_matches_kyc("Grace Hopper", Some("Ada Lovelace")));
        // No verified name yet: anything passes.
        assert!(holder_matches_kyc("Grace Hopper", None));
        assert!(holder_matches_kyc("Grace Hopper", Some("  ")));
    }
}
