use fp_math::MathError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    SaleNotFound = 4,
    // Rejected commands: nothing was written.
    SaleNotActive = 5,
    OutOfWindow = 6,
    BelowMinimum = 7,
    AboveMaximum = 8,
    HardCapExceeded = 9,
    InvalidAmount = 10,
    NotGenesisSale = 11,
    NoPointsPledged = 12,
    // External asset movement failed; settlement retries it on the next pass.
    TransferFailed = 13,
    AlreadySettled = 14,
    InvalidConfiguration = 15,
    SaleNotClosed = 16,
    AllocationNotFound = 17,
    ArithmeticOverflow = 18,
    SaleBusy = 19,
}

impl From<MathError> for Error {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => Error::ArithmeticOverflow,
            MathError::DivisionByZero | MathError::Underflow => Error::InvalidConfiguration,
        }
    }
}
