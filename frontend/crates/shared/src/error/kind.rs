//! Error Kind - Classification of errors
//!
//! Defines the closed [`ErrorKind`] taxonomy surfaced to callers of the
//! session layer and the backend API wrappers.

use serde::Serialize;

/// エラー種別の列挙体
///
/// 呼び出し側に公開されるエラー分類（閉じた集合）です。
/// ID プロバイダ固有のエラーコードはこの分類に変換されてから上位へ渡されます。
/// 利用者向けの文言への変換はプレゼンテーション層で行います。
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NoSession;
/// assert_eq!(kind.as_str(), "NO_SESSION");
/// assert!(kind.is_unauthenticated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// 資格情報（メールアドレス/パスワード）が不正
    InvalidCredentials,
    /// アカウントのメール確認が未完了
    UserNotConfirmed,
    /// 確認コードが不正
    InvalidCode,
    /// 確認コードの有効期限切れ
    CodeExpired,
    /// 有効なセッションが存在しない（未認証）
    NoSession,
    /// ネットワークに到達できない
    NetworkUnavailable,
    /// 入力値の前提条件違反（必須項目が空、形式不正など）
    InvalidInput,
    /// 分類不能なエラー
    Unknown,
}

impl ErrorKind {
    /// すべての種別（表示テーブルの網羅性確認用）
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::InvalidCredentials,
        ErrorKind::UserNotConfirmed,
        ErrorKind::InvalidCode,
        ErrorKind::CodeExpired,
        ErrorKind::NoSession,
        ErrorKind::NetworkUnavailable,
        ErrorKind::InvalidInput,
        ErrorKind::Unknown,
    ];

    /// 機械可読なコード文字列を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::InvalidCode.as_str(), "INVALID_CODE");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::UserNotConfirmed => "USER_NOT_CONFIRMED",
            ErrorKind::InvalidCode => "INVALID_CODE",
            ErrorKind::CodeExpired => "CODE_EXPIRED",
            ErrorKind::NoSession => "NO_SESSION",
            ErrorKind::NetworkUnavailable => "NETWORK_UNAVAILABLE",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// 未認証として扱うべきエラーかどうか
    ///
    /// `NoSession` は「不明なロール」ではなく「未ログイン」を意味します。
    #[inline]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, ErrorKind::NoSession)
    }

    /// 同じ操作を再試行すれば成功し得るかどうか
    ///
    /// コア自身は再試行しません。判断は呼び出し側に委ねます。
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::NetworkUnavailable)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
