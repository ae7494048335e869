use fp_math::{Dilution, Schedule};
use soroban_sdk::{contracttype, Address, Env, String, Vec};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SaleStatus {
    Pending = 0,
    Active = 1,
    Successful = 2,
    Failed = 3,
    Settled = 4,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum AllocationCategory {
    PublicSale = 0,
    Developer = 1,
    LiquidityPool = 2,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[contracttype]
pub struct VestingConfig {
    pub cliff_months: u32,
    pub vesting_months: u32,
}

impl VestingConfig {
    pub fn schedule(&self) -> Schedule {
        Schedule::new(self.cliff_months, self.vesting_months)
    }
}

/// Points-weighted allocation inputs, supplied by the registry at creation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct GenesisTerms {
    pub total_supply: i128,
    pub max_supply_fraction_bps: u32,
    pub per_participant_cap_bps: u32,
    pub point_ceiling: i128, // Per participant, per sale
}

/// How a sale allocates: by commitment alone, or by pledged points.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SaleKind {
    Standard,
    Genesis(GenesisTerms),
}

impl SaleKind {
    pub fn terms(&self) -> Option<&GenesisTerms> {
        match self {
            SaleKind::Standard => None,
            SaleKind::Genesis(terms) => Some(terms),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct CategoryGrant {
    pub category: AllocationCategory,
    pub beneficiary: Address,
    pub amount: i128,
    pub vesting: VestingConfig,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SaleParams {
    pub agent_id: String,
    pub treasury: Address,
    pub commit_token: Address,
    pub sale_token: Address,
    pub kind: SaleKind,
    pub price: i128, // Commit-token base units per sale-token base unit
    pub hard_cap: i128,
    pub soft_cap: i128,
    pub min_purchase: i128,
    pub max_purchase: i128,
    pub start_time: u64,
    pub end_time: u64,
    pub close_on_hard_cap: bool,
    pub allocable_pool: i128,
    pub vesting: VestingConfig,
    pub grants: Vec<CategoryGrant>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Sale {
    pub id: u64,
    pub agent_id: String,
    pub creator: Address,
    pub treasury: Address,
    pub commit_token: Address,
    pub sale_token: Address,
    pub kind: SaleKind,
    pub price: i128,
    pub hard_cap: i128,
    pub soft_cap: i128,
    pub min_purchase: i128,
    pub max_purchase: i128,
    pub start_time: u64,
    pub end_time: u64,
    pub raised: i128,
    pub total_points: i128,
    pub participant_count: u32,
    pub status: SaleStatus,
    pub hard_cap_reached: bool,
    pub close_on_hard_cap: bool,
    pub allocable_pool: i128,
    pub vesting: VestingConfig,
    pub grants: Vec<CategoryGrant>,
    pub created_at: u64,
    pub closed_at: u64,
}

impl Sale {
    pub fn is_genesis(&self) -> bool {
        matches!(self.kind, SaleKind::Genesis(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(
            self.status,
            SaleStatus::Successful | SaleStatus::Failed | SaleStatus::Settled
        )
    }

    pub fn in_window(&self, now: u64) -> bool {
        now >= self.start_time && now < self.end_time
    }

    pub fn grant_reserve(&self) -> i128 {
        self.grants.iter().map(|g| g.amount).sum()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Config {
    pub admin: Address,
    pub operator: Address, // Drives close_if_due / run_settlement
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ParticipantView {
    pub committed: i128,
    pub points_pledged: i128,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Allocation {
    pub holder: Address,
    pub sale_id: u64,
    pub category: AllocationCategory,
    pub token_amount: i128,
    pub claimed_amount: i128,
    pub grant_time: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AllocationView {
    pub token_amount: i128,
    pub claimed_amount: i128,
    pub claimable: i128,
}

/// Settled marker: a participant with an outcome is never processed again.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ParticipantOutcome {
    pub committed: i128,
    pub tokens: i128,
    pub cost: i128,
    pub refund: i128,
    pub settled_at: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub struct DilutionFactor {
    pub numerator: i128,
    pub denominator: i128,
}

impl From<Dilution> for DilutionFactor {
    fn from(d: Dilution) -> Self {
        DilutionFactor {
            numerator: d.numerator,
            denominator: d.denominator,
        }
    }
}

impl From<DilutionFactor> for Dilution {
    fn from(d: DilutionFactor) -> Self {
        Dilution {
            numerator: d.numerator,
            denominator: d.denominator,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Settlement {
    pub outcome: SaleStatus,
    pub cursor: u32,
    pub settled_count: u32,
    pub demand_measured: bool, // Genesis only: raw entitlements summed, dilution fixed
    pub raw_demand: i128,
    pub dilution: DilutionFactor,
    pub total_allocated: i128,
    pub total_refunded: i128,
    pub proceeds: i128,
    pub proceeds_released: bool,
    pub unsold_returned: bool,
    pub grants_issued: bool,
    pub started_at: u64,
    pub completed_at: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SettlementState {
    InProgress = 0,
    Completed = 1,
    AlreadySettled = 2,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SettlementReport {
    pub state: SettlementState,
    pub processed: u32,
    pub pending_retry: u32,
    pub remaining: u32,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    SaleCount,
    Sale(u64),
    Participant(u64, u32), // Sale, join index
    Commitment(u64, Address),
    Pledge(u64, Address),
    Outcome(u64, Address),
    Allocation(u64, Address, AllocationCategory),
    Settlement(u64),
    SaleLock(u64),
}

pub fn get_ledger_timestamp(env: &Env) -> u64 {
    env.ledger().timestamp()
}
