use super::IdentityError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords::verify_password;
use crate::domain::identity::{IdentityUser, normalize};

pub struct SignIn<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub require_confirmed_account: bool,
}

#[derive(Debug, Clone)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> SignIn<'a, R> {
    pub async fn execute(&self, req: &SignInRequest) -> Result<IdentityUser, IdentityError> {
        let Some(user) = self
            .repo
            .find_by_normalized_email(&normalize(&req.email))
            .await?
        else {
            return Err(IdentityError::InvalidCredentials);
        };
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(IdentityError::InvalidCredentials);
        };
        if !verify_password(hash, &req.password)? {
            tracing::debug!(user_id = %user.id, "sign_in_bad_password");
            return Err(IdentityError::InvalidCredentials);
        }
        if self.require_confirmed_account && !user.email_confirmed {
            tracing::info!(user_id = %user.id, "sign_in_not_allowed_unconfirmed");
            return Err(IdentityError::NotAllowed);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryUserRepository;

    fn request(email: &str, password: &str) -> SignInRequest {
        SignInRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn unconfirmed_account_signs_in_when_confirmation_not_required() {
        let repo = InMemoryUserRepository::default();
        repo.seed("alice@example.com", "Passw0rd!", false).await;
        let uc = SignIn {
            repo: &repo,
            require_confirmed_account: false,
        };
        let user = uc
            .execute(&request("Alice@Example.com", "Passw0rd!"))
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn unconfirmed_account_is_refused_when_confirmation_required() {
        let repo = InMemoryUserRepository::default();
        repo.seed("alice@example.com", "Passw0rd!", false).await;
        let uc = SignIn {
            repo: &repo,
            require_confirmed_account: true,
        };
        let err = uc
            .execute(&request("alice@example.com", "Passw0rd!"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NotAllowed));

        repo.seed("bob@example.com", "Passw0rd!", true).await;
        assert!(
            uc.execute(&request("bob@example.com", "Passw0rd!"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let repo = InMemoryUserRepository::default();
        repo.seed("alice@example.com", "Passw0rd!", true).await;
        let uc = SignIn {
            repo: &repo,
            require_confirmed_account: false,
        };
        let bad_pw = uc
            .execute(&request("alice@example.com", "nope"))
            .await
            .unwrap_err();
        let unknown = uc
            .execute(&request("carol@example.com", "Passw0rd!"))
            .await
            .unwrap_err();
        assert_eq!(bad_pw.to_string(), unknown.to_string());
        assert!(matches!(unknown, IdentityError::InvalidCredentials));
    }
}
