//! Loan management service

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, LoanDetails, UpdateLoan},
    repository::Repository,
};

/// Field error for a write payload referencing a missing row
fn invalid_pk(field: &str, id: i32) -> AppError {
    AppError::field(
        field,
        &format!("Clave primaria \"{}\" inválida - objeto no existe.", id),
    )
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all loans
    pub async fn list_loans(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list().await
    }

    /// Get loan by ID
    pub async fn get_loan(&self, id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(id).await
    }

    /// Create a new loan
    pub async fn create_loan(&self, loan: &CreateLoan) -> AppResult<LoanDetails> {
        if !self.repository.users.exists(loan.cliente).await? {
            return Err(invalid_pk("cliente", loan.cliente));
        }
        if !self.repository.books.exists(loan.libro).await? {
            return Err(invalid_pk("libro", loan.libro));
        }

        self.repository.loans.create(loan).await
    }

    /// Update an existing loan
    pub async fn update_loan(&self, id: i32, loan: &UpdateLoan) -> AppResult<LoanDetails> {
        // 404 before any field errors
        self.repository.loans.get_details(id).await?;

        if let Some(cliente) = loan.cliente {
            if !self.repository.users.exists(cliente).await? {
                return Err(invalid_pk("cliente", cliente));
            }
        }
        if let Some(libro) = loan.libro {
            if !self.repository.books.exists(libro).await? {
                return Err(invalid_pk("libro", libro));
            }
        }

        self.repository.loans.update(id, loan).await
    }

    /// Delete a loan
    pub async fn delete_loan(&self, id: i32) -> AppResult<()> {
        self.repository.loans.get_details(id).await?;
        self.repository.loans.delete(id).await
    }

    /// Return a loan
    pub async fn return_loan(&self, id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.return_loan(id).await
    }
}
