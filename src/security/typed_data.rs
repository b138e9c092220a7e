use alloy::{
    primitives::{Address, B256, U256},
    sol_types::Eip712Domain,
};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::borrow::Cow;

use crate::types::TransferRequest;

/// `"\x19\x01"`, prepended to the separator and struct hash before the final hash.
pub const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";
pub const TRANSFER_REQUEST_TYPE_NAME: &str = "TransferRequest";

/// Scopes a signature to one (name, version, chain, verifying contract) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDescriptor {
    pub name: String,
    pub version: String,
    pub chain_id: U256,
    pub verifying_contract: Address,
}

pub fn build_domain(
    name: impl Into<String>,
    version: impl Into<String>,
    chain_id: U256,
    verifying_contract: Address,
) -> DomainDescriptor {
    DomainDescriptor {
        name: name.into(),
        version: version.into(),
        chain_id,
        verifying_contract,
    }
}

impl DomainDescriptor {
    /// `hashStruct(EIP712Domain)`. Dynamic strings are hashed, the address is
    /// left-padded to a full word.
    pub fn separator(&self) -> B256 {
        let mut hasher = Keccak256::new();
        hasher.update(domain_schema().type_hash());
        hasher.update(keccak256(self.name.as_bytes()));
        hasher.update(keccak256(self.version.as_bytes()));
        hasher.update(self.chain_id.to_be_bytes::<32>());
        hasher.update(self.verifying_contract.into_word());
        finalize(hasher)
    }
}

impl From<&DomainDescriptor> for Eip712Domain {
    fn from(domain: &DomainDescriptor) -> Self {
        Eip712Domain {
            name: Some(Cow::Owned(domain.name.clone())),
            version: Some(Cow::Owned(domain.version.clone())),
            chain_id: Some(domain.chain_id),
            verifying_contract: Some(domain.verifying_contract),
            salt: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: &'static str,
}

/// An ordered list of typed members. The order is part of the encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub type_name: &'static str,
    pub fields: Vec<Field>,
}

impl FieldSchema {
    /// `Name(type1 name1,type2 name2,...)`
    pub fn encode_type(&self) -> String {
        let members = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.ty, field.name))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", self.type_name, members)
    }

    pub fn type_hash(&self) -> B256 {
        keccak256(self.encode_type().as_bytes())
    }
}

pub fn domain_schema() -> FieldSchema {
    FieldSchema {
        type_name: DOMAIN_TYPE_NAME,
        fields: vec![
            Field { name: "name", ty: "string" },
            Field { name: "version", ty: "string" },
            Field { name: "chainId", ty: "uint256" },
            Field { name: "verifyingContract", ty: "address" },
        ],
    }
}

pub fn schema_for_transfer_request() -> FieldSchema {
    FieldSchema {
        type_name: TRANSFER_REQUEST_TYPE_NAME,
        fields: vec![
            Field { name: "expireAt", ty: "uint256" },
            Field { name: "transferAmount", ty: "uint256" },
        ],
    }
}

/// `hashStruct(TransferRequest)`
pub fn struct_hash(request: &TransferRequest) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(schema_for_transfer_request().type_hash());
    hasher.update(request.expire_at.to_be_bytes::<32>());
    hasher.update(request.transfer_amount.to_be_bytes::<32>());
    finalize(hasher)
}

/// Digest a signer signs for `request` under `domain`.
pub fn signing_hash(domain: &DomainDescriptor, request: &TransferRequest) -> B256 {
    digest_with_separator(&domain.separator(), request)
}

pub(crate) fn digest_with_separator(separator: &B256, request: &TransferRequest) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(TYPED_DATA_PREFIX);
    hasher.update(separator);
    hasher.update(struct_hash(request));
    finalize(hasher)
}

fn keccak256(data: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    finalize(hasher)
}

fn finalize(hasher: Keccak256) -> B256 {
    let bytes: [u8; 32] = hasher.finalize().into();
    B256::from(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolStruct;

    mod sol {
        alloy::sol! {
            struct TransferRequest {
                uint256 expireAt;
                uint256 transferAmount;
            }
        }
    }

    fn test_domain() -> DomainDescriptor {
        build_domain(
            "Verifier",
            "1",
            U256::from(1u64),
            Address::repeat_byte(0x42),
        )
    }

    fn test_request() -> TransferRequest {
        TransferRequest::new(U256::from(100u64), U256::from(100000000000000000u64))
    }

    #[test]
    fn test_encode_type_strings() {
        assert_eq!(
            schema_for_transfer_request().encode_type(),
            "TransferRequest(uint256 expireAt,uint256 transferAmount)"
        );
        assert_eq!(
            domain_schema().encode_type(),
            "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)"
        );
    }

    #[test]
    fn test_schema_field_order() {
        let schema = schema_for_transfer_request();
        let names: Vec<_> = schema.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["expireAt", "transferAmount"]);
        assert!(schema.fields.iter().all(|f| f.ty == "uint256"));
    }

    #[test]
    fn test_separator_matches_alloy() {
        let domain = test_domain();
        let alloy_domain = Eip712Domain::from(&domain);
        assert_eq!(domain.separator(), alloy_domain.separator());
    }

    #[test]
    fn test_signing_hash_matches_alloy() {
        let domain = test_domain();
        let request = test_request();
        let message = sol::TransferRequest {
            expireAt: request.expire_at,
            transferAmount: request.transfer_amount,
        };

        assert_eq!(struct_hash(&request), message.eip712_hash_struct());
        assert_eq!(
            signing_hash(&domain, &request),
            message.eip712_signing_hash(&Eip712Domain::from(&domain))
        );
    }

    #[test]
    fn test_swapped_fields_change_digest() {
        let domain = test_domain();
        let request = test_request();
        let swapped = TransferRequest::new(request.transfer_amount, request.expire_at);
        assert_ne!(signing_hash(&domain, &request), signing_hash(&domain, &swapped));
    }

    #[test]
    fn test_each_domain_field_scopes_digest() {
        let request = test_request();
        let base = test_domain();
        let digest = signing_hash(&base, &request);

        let variants = [
            DomainDescriptor { name: "Other".to_string(), ..base.clone() },
            DomainDescriptor { version: "2".to_string(), ..base.clone() },
            DomainDescriptor { chain_id: U256::from(5u64), ..base.clone() },
            DomainDescriptor { verifying_contract: Address::repeat_byte(0x43), ..base.clone() },
        ];

        for domain in variants {
            assert_ne!(signing_hash(&domain, &request), digest);
        }
    }
}
