use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::core::library::{BookStatus, LibraryError, LibraryResult};

/// Lending operations that move a book between `AVAILABLE`, `BORROWED` and `RESERVED`.
///
/// | action             | allowed from          | moves to  |
/// |--------------------|-----------------------|-----------|
/// | borrow             | AVAILABLE, RESERVED   | BORROWED  |
/// | return             | BORROWED, RESERVED    | AVAILABLE |
/// | reserve            | AVAILABLE             | RESERVED  |
/// | cancel-reservation | RESERVED              | AVAILABLE |
///
/// Borrowing a reserved book turns the reservation straight into a loan.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LendingAction {
    Borrow,
    Return,
    Reserve,
    CancelReservation,
}

impl LendingAction {
    pub fn apply(&self, current: BookStatus) -> LibraryResult<BookStatus> {
        let allowed = match self {
            LendingAction::Borrow => current != BookStatus::Borrowed,
            LendingAction::Return => current != BookStatus::Available,
            LendingAction::Reserve => current == BookStatus::Available,
            LendingAction::CancelReservation => current == BookStatus::Reserved,
        };
        if allowed {
            Ok(self.target())
        } else {
            Err(LibraryError::invalid_transition(self.rejection()))
        }
    }

    pub fn target(&self) -> BookStatus {
        match self {
            LendingAction::Borrow => BookStatus::Borrowed,
            LendingAction::Return => BookStatus::Available,
            LendingAction::Reserve => BookStatus::Reserved,
            LendingAction::CancelReservation => BookStatus::Available,
        }
    }

    pub fn rejection(&self) -> &'static str {
        match self {
            LendingAction::Borrow => "Book is already borrowed",
            LendingAction::Return => "Book is not borrowed",
            LendingAction::Reserve => "Book is not available for reservation",
            LendingAction::CancelReservation => "Book is not reserved",
        }
    }
}

impl FromStr for LendingAction {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "borrow" => Ok(LendingAction::Borrow),
            "return" => Ok(LendingAction::Return),
            "reserve" => Ok(LendingAction::Reserve),
            "cancel-reservation" => Ok(LendingAction::CancelReservation),
            _ => Err(LibraryError::not_found(format!("unknown lending action {}", s).as_str())),
        }
    }
}

impl Display for LendingAction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LendingAction::Borrow => write!(f, "borrow"),
            LendingAction::Return => write!(f, "return"),
            LendingAction::Reserve => write!(f, "reserve"),
            LendingAction::CancelReservation => write!(f, "cancel-reservation"),
        }
    }
}
