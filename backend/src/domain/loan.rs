//! Loan record: one pick-up of one book by one user.
//!
//! A loan is *open* while `dropped_off` is false and *closed* afterwards.
//! Closing is a one-way transition; the constructor and [`Loan::close`]
//! together guarantee that a closed loan always carries a drop-off timestamp
//! and can never reopen. Loans are never deleted — history is permanent.

use chrono::{DateTime, Utc};

use crate::domain::{BookId, LoanId, UserId};

/// State errors raised by loan construction and transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoanStateError {
    /// The loan is already closed; closing is one-way.
    #[error("loan is already closed")]
    AlreadyClosed,
    /// A stored row claimed to be closed without a drop-off timestamp,
    /// or open with one.
    #[error("drop-off flag and timestamp disagree")]
    InconsistentDropOff,
    /// The drop-off timestamp precedes the pick-up timestamp.
    #[error("drop-off must not precede pick-up")]
    DropBeforePick,
}

/// Raw loan fields, typically read back from the store.
#[derive(Debug, Clone)]
pub struct LoanRecord {
    /// Loan identifier.
    pub id: LoanId,
    /// Book this loan references.
    pub book_id: BookId,
    /// User holding (or having held) the book.
    pub user_id: UserId,
    /// Pick-up timestamp.
    pub picked_at: DateTime<Utc>,
    /// Whether the book has been returned.
    pub dropped_off: bool,
    /// Return timestamp, present iff `dropped_off`.
    pub dropped_at: Option<DateTime<Utc>>,
}

/// A validated loan record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    id: LoanId,
    book_id: BookId,
    user_id: UserId,
    picked_at: DateTime<Utc>,
    dropped_off: bool,
    dropped_at: Option<DateTime<Utc>>,
}

impl Loan {
    /// Create a fresh open loan at pick-up time.
    pub fn open(book_id: BookId, user_id: UserId, picked_at: DateTime<Utc>) -> Self {
        Self {
            id: LoanId::new(),
            book_id,
            user_id,
            picked_at,
            dropped_off: false,
            dropped_at: None,
        }
    }

    /// Rehydrate a loan from stored fields, validating the state invariants.
    pub fn from_record(record: LoanRecord) -> Result<Self, LoanStateError> {
        let LoanRecord {
            id,
            book_id,
            user_id,
            picked_at,
            dropped_off,
            dropped_at,
        } = record;

        if dropped_off != dropped_at.is_some() {
            return Err(LoanStateError::InconsistentDropOff);
        }
        if let Some(dropped_at) = dropped_at
            && dropped_at < picked_at
        {
            return Err(LoanStateError::DropBeforePick);
        }

        Ok(Self {
            id,
            book_id,
            user_id,
            picked_at,
            dropped_off,
            dropped_at,
        })
    }

    /// Close the loan at `dropped_at`. Fails if the loan is already closed
    /// or the timestamp precedes pick-up.
    pub fn close(&mut self, dropped_at: DateTime<Utc>) -> Result<(), LoanStateError> {
        if self.dropped_off {
            return Err(LoanStateError::AlreadyClosed);
        }
        if dropped_at < self.picked_at {
            return Err(LoanStateError::DropBeforePick);
        }
        self.dropped_off = true;
        self.dropped_at = Some(dropped_at);
        Ok(())
    }

    /// Loan identifier.
    pub fn id(&self) -> LoanId {
        self.id
    }

    /// Book this loan references.
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    /// User holding (or having held) the book.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Pick-up timestamp.
    pub fn picked_at(&self) -> DateTime<Utc> {
        self.picked_at
    }

    /// Whether the book has been returned.
    pub fn dropped_off(&self) -> bool {
        self.dropped_off
    }

    /// Return timestamp, present iff the loan is closed.
    pub fn dropped_at(&self) -> Option<DateTime<Utc>> {
        self.dropped_at
    }

    /// True while the book is still held.
    pub fn is_open(&self) -> bool {
        !self.dropped_off
    }
}
