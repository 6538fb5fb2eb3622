pub mod kakao_user;

pub use kakao_user::{KakaoAccount, KakaoProfile, KakaoTokenResponse, KakaoUserInfo, OAuthState};
