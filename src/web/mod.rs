/*
 * Responsibility
 * - ブラウザ向けの 1 ページ (表示モデル / テンプレート / handler) をまとめる
 */
pub mod auth;
pub mod handlers;
mod routes;
pub mod view;

pub use routes::routes;
