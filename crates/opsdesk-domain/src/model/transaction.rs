//! Transaction - money moved for a client's shop
//!
//! Deposits and withdrawals share one record shape but live in separate
//! collections, so each gets a transparent newtype carrying its collection.

use super::date::flexible_date;
use super::document::{require_positive, require_text, Document, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Collection;
use std::ops::{Deref, DerefMut};

/// How the money was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Mobile Money")]
    MobileMoney,
    Cheque,
}

impl PaymentMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::BankTransfer => "Bank Transfer",
            PaymentMode::MobileMoney => "Mobile Money",
            PaymentMode::Cheque => "Cheque",
        }
    }

    pub fn all() -> &'static [PaymentMode] {
        &[
            PaymentMode::Cash,
            PaymentMode::BankTransfer,
            PaymentMode::MobileMoney,
            PaymentMode::Cheque,
        ]
    }
}

impl core::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl core::str::FromStr for PaymentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();
        PaymentMode::all()
            .iter()
            .copied()
            .find(|mode| {
                mode.display_name()
                    .replace(' ', "")
                    .eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "payment mode",
                value: s.to_string(),
            })
    }
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn collection(&self) -> Collection {
        match self {
            TransactionKind::Deposit => Collection::Deposits,
            TransactionKind::Withdrawal => Collection::Withdrawals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub shop_id: String,
    pub client_name: String,
    pub agent: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub amount: f64,
    pub payment_mode: PaymentMode,
}

impl Transaction {
    fn check(&self) -> Result<(), ValidationError> {
        require_text("shop id", &self.shop_id)?;
        require_text("client name", &self.client_name)?;
        require_text("agent", &self.agent)?;
        require_positive("amount", self.amount)?;
        Ok(())
    }
}

macro_rules! transaction_document {
    ($name:ident, $collection:expr) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Transaction);

        impl Deref for $name {
            type Target = Transaction;

            fn deref(&self) -> &Transaction {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Transaction {
                &mut self.0
            }
        }

        impl From<Transaction> for $name {
            fn from(transaction: Transaction) -> Self {
                Self(transaction)
            }
        }

        impl Document for $name {
            const COLLECTION: Collection = $collection;

            fn validate(&self) -> Result<(), ValidationError> {
                self.0.check()
            }

            fn agent_name(&self) -> Option<&str> {
                Some(&self.0.agent)
            }
        }
    };
}

transaction_document!(Deposit, Collection::Deposits);
transaction_document!(Withdrawal, Collection::Withdrawals);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(amount: f64) -> Transaction {
        Transaction {
            shop_id: "SH-1".to_string(),
            client_name: "Corner Store".to_string(),
            agent: "Ravi".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            amount,
            payment_mode: PaymentMode::Cash,
        }
    }

    #[test]
    fn test_newtypes_pick_their_collection() {
        assert_eq!(Deposit::COLLECTION, TransactionKind::Deposit.collection());
        assert_eq!(Withdrawal::COLLECTION, TransactionKind::Withdrawal.collection());
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(Deposit(sample(250.0)).validate().is_ok());
        assert!(Withdrawal(sample(-3.0)).validate().is_err());
    }

    #[test]
    fn test_transparent_wire_format() {
        let json = serde_json::to_value(Deposit(sample(250.0))).unwrap();
        assert_eq!(json["paymentMode"], "Cash");
        assert_eq!(json["shopId"], "SH-1");
        assert_eq!(json["date"], "2024-05-02");
    }

    #[test]
    fn test_payment_mode_from_str() {
        assert_eq!("bank transfer".parse::<PaymentMode>().unwrap(), PaymentMode::BankTransfer);
        assert_eq!("mobile-money".parse::<PaymentMode>().unwrap(), PaymentMode::MobileMoney);
        assert!("crypto".parse::<PaymentMode>().is_err());
    }
}
