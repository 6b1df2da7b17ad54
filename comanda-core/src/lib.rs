//! Comanda Core - 餐厅订单/客户引擎
//!
//! The customer/address reconciliation and order total/numbering engine of
//! the Comanda POS backend. Record CRUD, authentication and HTTP routing
//! live in outer layers; this crate owns the parts with real consistency
//! concerns:
//!
//! - **customers**: address reconciliation (pure merge algorithm) and the
//!   customer directory (sole writer of customer records, optimistic
//!   concurrency on the address collection)
//! - **orders**: order compilation (validation, price snapshots, totals),
//!   the per-restaurant order-number sequencer (atomic counter rows) and
//!   the status lifecycle
//! - **db**: SQLite storage via a shared pool, one repository per record
//!
//! # 模块结构
//!
//! ```text
//! comanda-core/src/
//! ├── core/          # 配置、引擎装配
//! ├── customers/     # 地址合并、客户目录
//! ├── orders/        # 订单编译、编号、状态机
//! ├── db/            # 数据库层
//! └── utils/         # 日志等工具
//! ```

pub mod core;
pub mod customers;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Engine, setup_environment};
pub use customers::{CustomerDirectory, DirectoryError, ReconcileError, Reconciled, reconcile};
pub use db::DbService;
pub use db::repository::{RepoError, RepoResult};
pub use orders::{OrderError, OrderResult, OrderSequencer, OrderService};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
