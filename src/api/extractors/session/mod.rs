/*!
 * Current session extractor
 *
 * Responsibility:
 * - リクエストから現在のセッション（SessionRecord）を handler に明示的に渡す
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - SessionRecord
 * - CurrentSession
 */

mod core;
mod types;

pub use self::core::CurrentSession;
pub use types::SessionRecord;
