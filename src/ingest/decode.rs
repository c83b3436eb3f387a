// src/ingest/decode.rs
//
// Chinese portal exports arrive in one of three encodings: UTF-8 with a
// BOM (Excel's "CSV UTF-8"), plain UTF-8, or a GBK-family encoding from
// older tools. Decode accordingly; GB18030 is a superset of GBK so one
// fallback covers the family.

use std::borrow::Cow;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

pub fn decode_csv_bytes(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes
        .strip_prefix(&UTF8_BOM)
        .unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::GB18030.decode(bytes);
            Cow::Owned(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("总价(万),面积(㎡)".as_bytes());
        let decoded = decode_csv_bytes(&bytes);
        assert_eq!(decoded.as_ref(), "总价(万),面积(㎡)");
    }

    #[test]
    fn plain_utf8_passes_through() {
        let decoded = decode_csv_bytes("区域,商圈".as_bytes());
        assert_eq!(decoded.as_ref(), "区域,商圈");
    }

    #[test]
    fn gbk_bytes_are_decoded() {
        let (encoded, _, _) = encoding_rs::GB18030.encode("总价,静安");
        assert!(std::str::from_utf8(&encoded).is_err());
        let decoded = decode_csv_bytes(&encoded);
        assert_eq!(decoded.as_ref(), "总价,静安");
    }
}
