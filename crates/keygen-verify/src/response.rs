//! Extraction of verification parameters from a transport response.

use reqwest::header::HeaderMap;

use crate::cache::CacheRecord;
use crate::canonical::SigningComponents;
use crate::digest::ContentDigest;
use crate::error::{VerifyError, VerifyResult};
use crate::signature::{SignatureEnvelope, SIGNATURE_HEADER};

/// Everything needed to verify a response and to persist it afterwards.
///
/// Built once per response; both the immediate verification and the cache
/// write-through read from the same value.
#[derive(Debug, Clone)]
pub struct SignedResponse {
    status: u16,
    method: String,
    path: String,
    date: String,
    signature: SignatureEnvelope,
    digest_header: Option<String>,
    body: Vec<u8>,
}

impl SignedResponse {
    /// Collect parameters from response parts.
    ///
    /// `method` and `path` describe the request as issued, not the URL the
    /// response was eventually served from.
    pub fn from_parts(
        status: u16,
        headers: &HeaderMap,
        body: Vec<u8>,
        method: &str,
        path: &str,
    ) -> VerifyResult<Self> {
        let signature_header = header_str(headers, SIGNATURE_HEADER).ok_or_else(|| {
            VerifyError::MissingHeader {
                name: "Keygen-Signature".to_string(),
            }
        })?;
        let signature = SignatureEnvelope::parse(signature_header)?;

        let date = header_str(headers, "date").ok_or_else(|| VerifyError::MissingHeader {
            name: "Date".to_string(),
        })?;

        Ok(Self {
            status,
            method: method.to_ascii_lowercase(),
            path: path.to_string(),
            date: date.to_string(),
            signature,
            digest_header: header_str(headers, "digest").map(String::from),
            body,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// `"{method} {path}"` as signed.
    pub fn target(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn signature(&self) -> &SignatureEnvelope {
        &self.signature
    }

    /// Raw `Digest` header, if the issuer sent one.
    pub fn digest_header(&self) -> Option<&str> {
        self.digest_header.as_deref()
    }

    /// Body bytes exactly as received.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Digest of the body bytes.
    pub fn digest(&self) -> ContentDigest {
        ContentDigest::of(&self.body)
    }

    pub fn signing_components(&self, host: &str) -> SigningComponents {
        SigningComponents::new(
            &self.method,
            self.path.as_str(),
            host,
            self.date.as_str(),
            &self.digest(),
        )
    }

    /// Record persisted after verification succeeds.
    pub fn to_cache_record(&self) -> VerifyResult<CacheRecord> {
        let body =
            String::from_utf8(self.body.clone()).map_err(|e| VerifyError::InvalidResponse {
                message: format!("response body is not UTF-8: {}", e),
            })?;

        Ok(CacheRecord {
            date: self.date.clone(),
            target: self.target(),
            signature: self.signature.signature().to_string(),
            body,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const PATH: &str = "/v1/accounts/ACME/licenses/actions/validate-key";
    const DATE: &str = "Tue, 01 Jan 2030 00:00:00 GMT";

    fn headers(signature: Option<&str>, date: Option<&str>, digest: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(s) = signature {
            map.insert("keygen-signature", HeaderValue::from_str(s).unwrap());
        }
        if let Some(d) = date {
            map.insert("date", HeaderValue::from_str(d).unwrap());
        }
        if let Some(d) = digest {
            map.insert("digest", HeaderValue::from_str(d).unwrap());
        }
        map
    }

    #[test]
    fn test_extracts_all_params() {
        let body = br#"{"meta":{"valid":true}}"#.to_vec();
        let digest = ContentDigest::of(&body).to_string();
        let h = headers(
            Some(r#"algorithm="ed25519", signature="abc=""#),
            Some(DATE),
            Some(&digest),
        );

        let resp = SignedResponse::from_parts(200, &h, body, "POST", PATH).unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.target(), format!("post {}", PATH));
        assert_eq!(resp.date(), DATE);
        assert_eq!(resp.signature().signature(), "abc=");
        assert_eq!(resp.digest_header(), Some(digest.as_str()));

        let c = resp.signing_components("api.example");
        assert_eq!(c.method(), "post");
        assert_eq!(c.host(), "api.example");
        assert_eq!(c.digest(), digest);
    }

    #[test]
    fn test_missing_signature_header() {
        let h = headers(None, Some(DATE), None);
        let err = SignedResponse::from_parts(200, &h, vec![], "POST", PATH).unwrap_err();
        assert!(matches!(err, VerifyError::MissingHeader { ref name } if name == "Keygen-Signature"));
    }

    #[test]
    fn test_garbled_signature_header() {
        let h = headers(Some("garbled"), Some(DATE), None);
        let err = SignedResponse::from_parts(200, &h, vec![], "POST", PATH).unwrap_err();
        assert!(matches!(err, VerifyError::SignatureInvalid { .. }));
    }

    #[test]
    fn test_missing_date_header() {
        let h = headers(Some(r#"signature="abc""#), None, None);
        let err = SignedResponse::from_parts(200, &h, vec![], "POST", PATH).unwrap_err();
        assert!(matches!(err, VerifyError::MissingHeader { ref name } if name == "Date"));
    }

    #[test]
    fn test_digest_header_is_optional() {
        let h = headers(Some(r#"signature="abc""#), Some(DATE), None);
        let resp = SignedResponse::from_parts(200, &h, b"{}".to_vec(), "POST", PATH).unwrap();
        assert!(resp.digest_header().is_none());
        assert_eq!(resp.digest(), ContentDigest::of(b"{}"));
    }

    #[test]
    fn test_cache_record_fields() {
        let h = headers(Some(r#"keyid="k", signature="c2ln""#), Some(DATE), None);
        let resp = SignedResponse::from_parts(200, &h, b"{}".to_vec(), "post", PATH).unwrap();

        let record = resp.to_cache_record().unwrap();
        assert_eq!(record.date, DATE);
        assert_eq!(record.target, format!("post {}", PATH));
        assert_eq!(record.signature, "c2ln");
        assert_eq!(record.body, "{}");
    }

    #[test]
    fn test_non_utf8_body_not_cacheable() {
        let h = headers(Some(r#"signature="abc""#), Some(DATE), None);
        let resp = SignedResponse::from_parts(200, &h, vec![0xff, 0xfe], "post", PATH).unwrap();
        assert!(matches!(
            resp.to_cache_record(),
            Err(VerifyError::InvalidResponse { .. })
        ));
    }
}
