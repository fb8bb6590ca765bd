// src/contracts/bootstrap.rs
//! Certification authorities seeded by `InitLedger`.

/// Key type shared by every bootstrap authority.
pub const CA_KEY_TYPE: &str = "Secp256k1";

/// A seeded certification authority: identifier, base64 SPKI public key and
/// detached signature.
pub struct BootstrapAuthority {
    pub did: &'static str,
    pub public_key: &'static str,
    pub signature: &'static str,
}

impl BootstrapAuthority {
    /// Identifier of the authority's single authentication method.
    pub fn method_id(&self) -> String {
        format!("{}#keys-1", self.did)
    }
}

pub const CERTIFICATION_AUTHORITIES: [BootstrapAuthority; 4] = [
    BootstrapAuthority {
        did: "did:CA:000001",
        public_key: "MFYwEAYHKoZIzj0CAQYFK4EEAAoDQgAEAiCSg/jaymN9G087hAY4vH8hn0eq1tqYuVNjJ8F+INPU7ba58YPlvbJaNLAJn22gvQ0fMi1Bc0twwKUd5NGTBQ==",
        signature: "MEQCIFzf1VNdgSXIGNKdOpP80URh3Uxe6Z0apINz78aSmU6XAiAPO6BdrT4vQkwekFI1kz1pofp+XKwd5TnOPAIKC2R3Nw==",
    },
    BootstrapAuthority {
        did: "did:CA:000002",
        public_key: "MFYwEAYHKoZIzj0CAQYFK4EEAAoDQgAE8K51BFNKq7vWJcSaQ5yLROodJHPQdAqsjK9TCW/yfEcwEWzDGfA7hIOH1R1a0gFrYcBXSfoHczGgxUxMpMVz4A==",
        signature: "MEQCIHk02CaV761fWeD6V9E9caZvaeCU9rKkyl8EIuVxR/yoAiAZ3Mk/cmXGE2rXfMjEiCw5y2ZaaaTdV2wcsjCtKH1VXQ==",
    },
    BootstrapAuthority {
        did: "did:CA:000003",
        public_key: "MFYwEAYHKoZIzj0CAQYFK4EEAAoDQgAEmR9mRDAkmZzElNf3OCWyFuZPV2vtILIlLjj4+GL0E39f1daSBvhOiOeJdqsnlmWjf57jX5fRRvJ7lrvm6ZZpKA==",
        signature: "MEYCIQD4PCNQFQ1kWQMfSjdjWI3nTLWpRJjuBCV0m04P+Bw3mQIhAOi5NUvMUpz2sttKqbWFsGtkQY3ww1IGRlGovqla3le1",
    },
    BootstrapAuthority {
        did: "did:CA:000004",
        public_key: "MFYwEAYHKoZIzj0CAQYFK4EEAAoDQgAELzx4l3awsI0Du1zz74w/HJe5cVFE3yORVjaZ/Hd0UXt+26bzDm8vlorT8T806ByKXA70wVesZkzgdtk8X+Yq0Q==",
        signature: "MEQCIEIoeHjkn68A6jI6Fr6USoJGYA3fZF6ONBHJBR2ebEdnAiBYhEnYCrreLzYk50V+jUllsqju5Mp3LKbDHavkugi+/Q==",
    },
];
