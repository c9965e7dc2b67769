//! Chain-specific record types and wire decoding
//!
//! The node encodes the same logical field in more than one shape depending
//! on query path and runtime version: amounts arrive as JSON numbers,
//! decimal strings, or 0x-hex strings; the epoch index arrives either as a
//! bare primitive or wrapped in a summary object. Everything is normalized
//! here, at the boundary; no other component ever sees a wire shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::domain::staking::MAX_NOMINATION_TAX_BPS;
use crate::core::error::StakingError;
use crate::core::result::StakingResult;
use crate::core::types::{
    AccountAddress, Amount, BlockNumber, DomainId, EpochIndex, OperatorId, SharePrice, Shares,
};
use crate::core::units;

/// Registration status of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorStatus {
    /// Accepting nominations and producing bundles
    Active,
    /// Deregistered; stake is unlocking
    Deregistered,
    /// Slashed for a protocol violation
    Slashed,
}

impl std::fmt::Display for OperatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Deregistered => write!(f, "deregistered"),
            Self::Slashed => write!(f, "slashed"),
        }
    }
}

/// On-chain operator record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorRecord {
    /// Operator identifier
    pub id: OperatorId,
    /// Operator signing key (hex-encoded)
    pub signing_key: String,
    /// Minimum stake a nominator must bring
    pub minimum_nominator_stake: Amount,
    /// Operator's cut of rewards, in basis points
    pub nomination_tax_bps: u16,
    /// Total stake currently in the pool
    pub current_total_stake: Amount,
    /// Total shares issued against the pool
    pub current_total_shares: Shares,
    /// Registration status
    pub status: OperatorStatus,
    /// Block at which the operator registered
    pub registered_at: Option<BlockNumber>,
    /// Block at which the operator deregistered, if it has
    pub deregistered_at: Option<BlockNumber>,
}

impl OperatorRecord {
    /// Decode an operator record from a node response
    pub fn from_wire(id: OperatorId, value: &Value) -> StakingResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            StakingError::decode(format!("operator {} response is not an object", id))
        })?;

        Ok(Self {
            id,
            signing_key: field(obj, &["signingKey", "signing_key"])
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            minimum_nominator_stake: field(obj, &["minimumNominatorStake", "minimum_nominator_stake"])
                .and_then(decode_amount)
                .unwrap_or(Amount::ZERO),
            nomination_tax_bps: field(obj, &["nominationTax", "nomination_tax"])
                .and_then(decode_u64)
                .map(|v| v.min(u64::from(MAX_NOMINATION_TAX_BPS)) as u16)
                .unwrap_or(0),
            current_total_stake: field(obj, &["currentTotalStake", "current_total_stake"])
                .and_then(decode_amount)
                .unwrap_or(Amount::ZERO),
            current_total_shares: field(obj, &["currentTotalShares", "current_total_shares"])
                .and_then(decode_amount)
                .map(|a| Shares::new(a.into_inner()))
                .unwrap_or(Shares::ZERO),
            status: field(obj, &["status"])
                .and_then(decode_operator_status)
                .unwrap_or(OperatorStatus::Active),
            registered_at: field(obj, &["registeredAt", "registered_at"]).and_then(decode_u64),
            deregistered_at: field(obj, &["deregisteredAt", "deregistered_at"])
                .and_then(decode_u64),
        })
    }

    /// Current value of one share: `floor(total_stake * 10^18 / total_shares)`
    ///
    /// `None` while the pool has no shares; valuation policy for that case
    /// lives with the caller.
    pub fn share_price(&self) -> Option<SharePrice> {
        units::share_price(self.current_total_stake, self.current_total_shares)
    }
}

/// On-chain account balance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Account the balances belong to
    pub address: AccountAddress,
    /// Free balance
    pub free: Amount,
    /// Reserved balance
    pub reserved: Amount,
    /// Frozen balance
    pub frozen: Amount,
}

impl BalanceRecord {
    /// Decode a balance record from a node response
    ///
    /// Accepts the structured account shape (optionally nested under
    /// `data`) or a bare primitive, which is read as the free balance.
    pub fn from_wire(address: AccountAddress, value: &Value) -> StakingResult<Self> {
        if let Some(amount) = decode_amount(value) {
            return Ok(Self {
                address,
                free: amount,
                reserved: Amount::ZERO,
                frozen: Amount::ZERO,
            });
        }

        let obj = value.as_object().ok_or_else(|| {
            StakingError::decode(format!("balance response for {} is not decodable", address))
        })?;
        let obj = match obj.get("data").and_then(Value::as_object) {
            Some(data) => data,
            None => obj,
        };

        Ok(Self {
            address,
            free: field(obj, &["free"]).and_then(decode_amount).unwrap_or(Amount::ZERO),
            reserved: field(obj, &["reserved"])
                .and_then(decode_amount)
                .unwrap_or(Amount::ZERO),
            frozen: field(obj, &["frozen", "miscFrozen", "misc_frozen"])
                .and_then(decode_amount)
                .unwrap_or(Amount::ZERO),
        })
    }

    /// Balance spendable right now
    ///
    /// The freeze overlaps the reserve, so only the portion of the freeze
    /// not already covered by the reserve reduces the free balance:
    /// `free - max(frozen - reserved, 0)`, floored at zero.
    pub fn available(&self) -> Amount {
        let uncovered_freeze = self.frozen.saturating_sub(self.reserved);
        self.free.saturating_sub(uncovered_freeze)
    }
}

/// Domain staking summary record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Domain identifier
    pub id: DomainId,
    /// Human-readable domain name
    pub name: String,
    /// Runtime the domain executes
    pub runtime_id: u32,
    /// Epoch currently in progress, if the node reported one
    pub current_epoch_index: Option<EpochIndex>,
    /// Most recently completed epoch, if the node reported one
    pub completed_epoch: Option<EpochIndex>,
}

impl DomainRecord {
    /// Decode a domain summary from a node response
    ///
    /// A structured summary fills every field; a primitive-encoded response
    /// carries the epoch index alone. The epoch index is advisory either
    /// way, so anything undecodable becomes `None` rather than an error.
    pub fn from_wire(id: DomainId, value: &Value) -> StakingResult<Self> {
        let Some(obj) = value.as_object() else {
            return Ok(Self {
                id,
                name: String::new(),
                runtime_id: 0,
                current_epoch_index: decode_epoch_index(value),
                completed_epoch: None,
            });
        };

        Ok(Self {
            id,
            name: field(obj, &["domainName", "domain_name", "name"])
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            runtime_id: field(obj, &["runtimeId", "runtime_id"])
                .and_then(decode_u64)
                .map(|v| v.min(u64::from(u32::MAX)) as u32)
                .unwrap_or(0),
            current_epoch_index: field(obj, &["currentEpochIndex", "current_epoch_index"])
                .and_then(decode_epoch_index_opt),
            completed_epoch: field(obj, &["completedEpoch", "completed_epoch"])
                .and_then(decode_epoch_index_opt),
        })
    }
}

/// Look up the first present spelling of a field
fn field<'a>(obj: &'a serde_json::Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| obj.get(*name))
}

/// Decode an amount that may be a JSON number, decimal string, or hex string
pub(crate) fn decode_amount(value: &Value) -> Option<Amount> {
    match value {
        Value::Number(n) => n.as_u64().map(Amount::from_u64),
        Value::String(s) => {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x") {
                primitive_types::U256::from_str_radix(hex, 16)
                    .ok()
                    .map(Amount::new)
            } else {
                Amount::from_dec_str(s).ok()
            }
        }
        _ => None,
    }
}

/// Decode a u64 that may be a JSON number or a decimal string
pub(crate) fn decode_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode an epoch index from either a bare primitive or a summary object
///
/// Accepts `5`, `"5"`, or `{"currentEpochIndex": 5}` (snake_case too).
/// Anything else decodes to `None`; the epoch index is advisory and must
/// never fault the caller.
pub fn decode_epoch_index(value: &Value) -> Option<EpochIndex> {
    if let Some(obj) = value.as_object() {
        return field(obj, &["currentEpochIndex", "current_epoch_index"])
            .and_then(decode_epoch_index_opt);
    }
    decode_epoch_index_opt(value)
}

fn decode_epoch_index_opt(value: &Value) -> Option<EpochIndex> {
    decode_u64(value).and_then(|v| EpochIndex::try_from(v).ok())
}

fn decode_operator_status(value: &Value) -> Option<OperatorStatus> {
    match value {
        Value::String(s) => match s.to_lowercase().as_str() {
            "active" | "registered" => Some(OperatorStatus::Active),
            "deregistered" => Some(OperatorStatus::Deregistered),
            "slashed" => Some(OperatorStatus::Slashed),
            _ => None,
        },
        // Enum-as-object encoding: {"deregistered": {...}} or {"slashed": null}
        Value::Object(obj) => {
            let key = obj.keys().next()?.to_lowercase();
            match key.as_str() {
                "active" | "registered" => Some(OperatorStatus::Active),
                "deregistered" => Some(OperatorStatus::Deregistered),
                "slashed" => Some(OperatorStatus::Slashed),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn test_address() -> AccountAddress {
        AccountAddress::new_unchecked("sucQo7ot2qpn3GqitsqCZCMTu1Jmh2T9Rg9nAWxgPCGDNEo4X".into())
    }

    #[test]
    fn test_decode_amount_shapes() {
        assert_eq!(decode_amount(&json!(1000)), Some(Amount::from_u64(1000)));
        assert_eq!(
            decode_amount(&json!("1000000000000000000")),
            Some(Amount::from_u64(1_000_000_000_000_000_000))
        );
        assert_eq!(decode_amount(&json!("0xde0b6b3a7640000")), Some(Amount::from_u64(1_000_000_000_000_000_000)));
        assert_eq!(decode_amount(&json!(null)), None);
        assert_eq!(decode_amount(&json!("garbage")), None);
        assert_eq!(decode_amount(&json!(-5)), None);
    }

    #[test]
    fn test_operator_from_wire_camel_case() {
        let wire = json!({
            "signingKey": "0xabc123",
            "minimumNominatorStake": "10000000000000000000",
            "nominationTax": 500,
            "currentTotalStake": "1000000000000000000000",
            "currentTotalShares": "500000000000000000000",
            "status": "active",
            "registeredAt": 1200,
        });

        let record = OperatorRecord::from_wire(OperatorId(3), &wire).unwrap();
        assert_eq!(record.id, OperatorId(3));
        assert_eq!(record.signing_key, "0xabc123");
        assert_eq!(record.nomination_tax_bps, 500);
        assert_eq!(record.status, OperatorStatus::Active);
        assert_eq!(record.registered_at, Some(1200));
        assert_eq!(record.deregistered_at, None);

        // 1000 AI3 over 500e18 shares => 2.0 per share
        let price = record.share_price().unwrap();
        assert_eq!(
            price.into_inner(),
            primitive_types::U256::from(2_000_000_000_000_000_000_u64)
        );
    }

    #[test]
    fn test_operator_from_wire_snake_case_and_enum_object_status() {
        let wire = json!({
            "signing_key": "0xdef",
            "current_total_stake": 4000,
            "current_total_shares": 2000,
            "status": {"deregistered": {"unlockAtBlock": 9000}},
            "deregistered_at": "8000",
        });

        let record = OperatorRecord::from_wire(OperatorId(9), &wire).unwrap();
        assert_eq!(record.status, OperatorStatus::Deregistered);
        assert_eq!(record.deregistered_at, Some(8000));
        assert_eq!(record.current_total_stake, Amount::from_u64(4000));
    }

    #[test]
    fn test_operator_from_wire_clamps_nomination_tax() {
        // 100% is the protocol ceiling; anything above is wire garbage
        let wire = json!({
            "currentTotalStake": 1000,
            "currentTotalShares": 500,
            "nominationTax": 60_000,
        });

        let record = OperatorRecord::from_wire(OperatorId(4), &wire).unwrap();
        assert_eq!(record.nomination_tax_bps, MAX_NOMINATION_TAX_BPS);
    }

    #[test]
    fn test_operator_from_wire_rejects_primitive() {
        let result = OperatorRecord::from_wire(OperatorId(1), &json!(42));
        assert!(matches!(result, Err(StakingError::Decode { .. })));
    }

    #[test]
    fn test_balance_from_wire_structured() {
        let wire = json!({
            "free": "100000000000000000000",
            "reserved": "5000000000000000000",
            "frozen": "20000000000000000000",
        });

        let record = BalanceRecord::from_wire(test_address(), &wire).unwrap();
        assert_eq!(record.free, Amount::from_dec_str("100000000000000000000").unwrap());
        // available = free - (frozen - reserved) = 100 - 15 = 85 AI3
        assert_eq!(
            record.available(),
            Amount::from_dec_str("85000000000000000000").unwrap()
        );
    }

    #[test]
    fn test_balance_from_wire_nested_data() {
        let wire = json!({
            "nonce": 7,
            "data": { "free": 1000, "reserved": 0, "frozen": 0 }
        });

        let record = BalanceRecord::from_wire(test_address(), &wire).unwrap();
        assert_eq!(record.free, Amount::from_u64(1000));
        assert_eq!(record.available(), Amount::from_u64(1000));
    }

    #[test]
    fn test_balance_from_wire_primitive() {
        let record = BalanceRecord::from_wire(test_address(), &json!("12345")).unwrap();
        assert_eq!(record.free, Amount::from_u64(12345));
        assert_eq!(record.reserved, Amount::ZERO);
    }

    #[test]
    fn test_balance_available_floors_at_zero() {
        let record = BalanceRecord {
            address: test_address(),
            free: Amount::from_u64(10),
            reserved: Amount::ZERO,
            frozen: Amount::from_u64(50),
        };
        assert_eq!(record.available(), Amount::ZERO);
    }

    #[test]
    fn test_domain_from_wire_structured() {
        let wire = json!({
            "domainName": "nova",
            "runtimeId": 0,
            "currentEpochIndex": 451,
            "completedEpoch": 450,
        });

        let record = DomainRecord::from_wire(DomainId(0), &wire).unwrap();
        assert_eq!(record.name, "nova");
        assert_eq!(record.current_epoch_index, Some(451));
        assert_eq!(record.completed_epoch, Some(450));
    }

    #[test]
    fn test_domain_from_wire_primitive_epoch() {
        let record = DomainRecord::from_wire(DomainId(1), &json!(99)).unwrap();
        assert_eq!(record.current_epoch_index, Some(99));
        assert_eq!(record.name, "");
    }

    #[test]
    fn test_decode_epoch_index_shapes() {
        assert_eq!(decode_epoch_index(&json!(5)), Some(5));
        assert_eq!(decode_epoch_index(&json!("5")), Some(5));
        assert_eq!(decode_epoch_index(&json!({"currentEpochIndex": 5})), Some(5));
        assert_eq!(
            decode_epoch_index(&json!({"current_epoch_index": "17"})),
            Some(17)
        );
        assert_eq!(decode_epoch_index(&json!({"unrelated": true})), None);
        assert_eq!(decode_epoch_index(&json!([1, 2, 3])), None);
        assert_eq!(decode_epoch_index(&json!(null)), None);
    }
}
