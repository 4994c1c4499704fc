//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// セッション層とバックエンド API ラッパーで共通に使用するエラー型です。
/// ビルダーパターンを使用してエラーを構築できます。
///
/// ## Fields
/// * `kind` - エラーの分類（閉じた集合）
/// * `message` - 開発者向けの説明（利用者向け文言はプレゼンテーション層で決定）
/// * `action` - 利用者が取るべきアクション（オプション）
/// * `source` - 元のエラー（オプション、デバッグ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// // シンプルなエラー
/// let err = AppError::new(ErrorKind::NoSession, "No id token in session store");
///
/// // 詳細なエラー
/// let err = AppError::invalid_input("Phone number is empty")
///     .with_action("Please enter a phone number");
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// 説明メッセージ
    message: Cow<'static, str>,
    /// 利用者が取るべきアクション
    action: Option<Cow<'static, str>>,
    /// 元のエラー（デバッグ用）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// アプリケーション結果型エイリアス
///
/// `Result<T, AppError>` の省略形です。
///
/// ## Examples
/// ```rust
/// use kernel::error::app_error::{AppError, AppResult};
///
/// fn bearer(token: Option<&str>) -> AppResult<String> {
///     let token = token.ok_or_else(|| AppError::no_session("Missing id token"))?;
///     Ok(format!("Bearer {token}"))
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    ///
    /// ## Arguments
    /// * `kind` - エラー種別
    /// * `message` - 説明メッセージ
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            source: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 資格情報不正
    #[inline]
    pub fn invalid_credentials(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// メール未確認
    #[inline]
    pub fn user_not_confirmed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::UserNotConfirmed, message)
    }

    /// 確認コード不正
    #[inline]
    pub fn invalid_code(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidCode, message)
    }

    /// 確認コード期限切れ
    #[inline]
    pub fn code_expired(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::CodeExpired, message)
    }

    /// セッションなし（未認証）
    #[inline]
    pub fn no_session(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NoSession, message)
    }

    /// ネットワーク到達不能
    #[inline]
    pub fn network_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NetworkUnavailable, message)
    }

    /// 入力値の前提条件違反
    #[inline]
    pub fn invalid_input(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// 分類不能
    #[inline]
    pub fn unknown(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// 利用者向けアクションを設定
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::AppError;
    /// let err = AppError::no_session("Session expired")
    ///     .with_action("Please sign in again");
    /// ```
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// 元のエラーを設定（デバッグ用）
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::{AppError, AppResult};
    ///
    /// fn read_profile() -> AppResult<String> {
    ///     let raw = std::fs::read_to_string("profile.json")
    ///         .map_err(|e| AppError::unknown("Failed to read profile").with_source(e))?;
    ///     Ok(raw)
    /// }
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// メッセージを取得
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// アクションを取得
    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// 未認証エラーかどうか
    #[inline]
    pub fn is_unauthenticated(&self) -> bool {
        self.kind.is_unauthenticated()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Option extension traits
// ============================================================================

/// `Option<T>` を `AppResult<T>` に変換するための拡張トレイト
pub trait OptionExt<T> {
    /// `None` の場合に `AppError` を返す
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>;

    /// `None` の場合に `NoSession` を返す
    fn ok_or_no_session(self, message: impl Into<Cow<'static, str>>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_else(|| AppError::new(kind, message))
    }

    fn ok_or_no_session(self, message: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_app_err(ErrorKind::NoSession, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::InvalidCode, "Code mismatch");
        assert_eq!(err.kind(), ErrorKind::InvalidCode);
        assert_eq!(err.message(), "Code mismatch");
        assert!(err.action().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(AppError::invalid_credentials("t").kind(), ErrorKind::InvalidCredentials);
        assert_eq!(AppError::user_not_confirmed("t").kind(), ErrorKind::UserNotConfirmed);
        assert_eq!(AppError::invalid_code("t").kind(), ErrorKind::InvalidCode);
        assert_eq!(AppError::code_expired("t").kind(), ErrorKind::CodeExpired);
        assert_eq!(AppError::no_session("t").kind(), ErrorKind::NoSession);
        assert_eq!(AppError::network_unavailable("t").kind(), ErrorKind::NetworkUnavailable);
        assert_eq!(AppError::invalid_input("t").kind(), ErrorKind::InvalidInput);
        assert_eq!(AppError::unknown("t").kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_with_action() {
        let err = AppError::no_session("Session expired").with_action("Please sign in again");
        assert_eq!(err.action(), Some("Please sign in again"));
    }

    #[test]
    fn test_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AppError::unknown("Failed to read file").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = AppError::no_session("Missing id token");
        assert_eq!(err.to_string(), "[NO_SESSION] Missing id token");

        let err_with_action =
            AppError::invalid_input("Invalid email").with_action("Enter valid email");
        assert!(err_with_action.to_string().contains("Action:"));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<&str> = None;
        let result = none.ok_or_no_session("No token");
        assert!(result.unwrap_err().is_unauthenticated());

        let some: Option<i32> = Some(42);
        let result = some.ok_or_no_session("No token");
        assert_eq!(result.unwrap(), 42);
    }
}
