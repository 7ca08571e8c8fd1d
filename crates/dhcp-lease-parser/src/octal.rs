/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */
/// Converts a (possibly quoted) dhcpd string such as `"\001\000\021"` into a hex dump like
/// `01 00 11 `.
///
/// Every byte of the input produces one token, except `\` followed by three octal digits, which
/// is collapsed into the single byte it encodes. Each token is followed by a space, including the
/// last one. Malformed escapes are never an error: the backslash is emitted as a literal `5c`.
pub fn decode(value: &str) -> String {
    let mut rest = value.trim_matches('"').as_bytes();

    std::iter::from_fn(|| {
        let (token, consumed) = match (escaped_octal(rest), rest.first()) {
            (Some(octal), _) => (octal, 4),
            (None, Some(byte)) => (u32::from(*byte), 1),
            (None, None) => return None,
        };
        rest = &rest[consumed..];
        Some(format!("{token:02x} "))
    })
    .collect()
}

/// Returns the value of a `\NNN` escape at the start of `bytes`, if there is one
fn escaped_octal(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [b'\\', a, b, c, ..] if [a, b, c].iter().all(|d| is_octal_digit(**d)) => Some(
            [a, b, c]
                .iter()
                .fold(0, |acc, d| acc * 8 + u32::from(**d - b'0')),
        ),
        _ => None,
    }
}

fn is_octal_digit(c: u8) -> bool {
    (b'0'..=b'7').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mixed_escapes_and_literals() {
        assert_eq!(decode("\"\\001\\002abc\""), "01 02 61 62 63 ");
    }

    #[test]
    fn test_decode_non_octal_digits_are_literal() {
        assert_eq!(decode("\"\\999\""), "5c 39 39 39 ");
        // 8 is not an octal digit either
        assert_eq!(decode("\\018"), "5c 30 31 38 ");
    }

    #[test]
    fn test_decode_short_trailing_escape() {
        assert_eq!(decode("\"a\\01\""), "61 5c 30 31 ");
        assert_eq!(decode("\\"), "5c ");
    }

    #[test]
    fn test_decode_typical_client_identifier() {
        assert_eq!(
            decode("\"\\001\\000\\021\\\"3DU\""),
            "01 00 11 5c 22 33 44 55 "
        );
        assert_eq!(
            decode("\"\\377\\000\\000\\000\\000\\000\\002\\000\\000\""),
            "ff 00 00 00 00 00 02 00 00 "
        );
    }

    #[test]
    fn test_decode_trims_all_surrounding_quotes() {
        assert_eq!(decode("\"\"ab\"\""), "61 62 ");
        assert_eq!(decode("ab"), "61 62 ");
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(""), "");
        assert_eq!(decode("\"\""), "");
    }

    #[test]
    fn test_decode_out_of_byte_range_escape() {
        // \777 is 511, rendered in full rather than truncated
        assert_eq!(decode("\\777"), "1ff ");
    }
}
