//! Resolving the accounts a market needs, before anything is started.

use std::sync::Arc;

use tracing::{debug, info};

use super::{BuilderContext, BuilderError, BuilderTarget};
use crate::application::ports::AccountDecoder;
use crate::application::state::{PullSource, StateError, StateSource, facets, with_deadline};
use crate::domain::accounts::{Account, Group, TokenAccount};
use crate::domain::market::Market;
use crate::domain::shared::{Address, DecodeError, Token};

const LOCATOR: &str = "account_locator";

/// Per-market-kind accounts found during resolution.
#[derive(Debug, Clone)]
pub(crate) enum MarketPlan {
    /// Serum: trades from wallet token accounts through one open-orders account.
    Serum {
        open_orders: Address,
        base_token: TokenAccount,
        quote_token: TokenAccount,
    },
    /// Spot: trades through the margin account's open-orders account for the slot.
    Spot {
        slot: usize,
        open_orders: Address,
        all_open_orders: Vec<Address>,
    },
    /// Perp: orders live in the margin account itself.
    Perp {
        slot: usize,
        all_open_orders: Vec<Address>,
    },
}

impl MarketPlan {
    /// Open-orders accounts whose balances count towards inventory.
    pub(crate) fn inventory_open_orders(&self) -> Vec<Address> {
        match self {
            Self::Serum { open_orders, .. } => vec![*open_orders],
            Self::Spot {
                all_open_orders, ..
            }
            | Self::Perp {
                all_open_orders, ..
            } => all_open_orders.clone(),
        }
    }

    /// Open-orders account holding the market's resting orders, if the
    /// market keeps them in one.
    pub(crate) const fn market_open_orders(&self) -> Option<Address> {
        match self {
            Self::Serum { open_orders, .. } | Self::Spot { open_orders, .. } => Some(*open_orders),
            Self::Perp { .. } => None,
        }
    }
}

/// Everything construction needs, loaded without side effects.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedAccounts {
    pub(crate) group: Group,
    pub(crate) account: Account,
    pub(crate) order_owner: Address,
    pub(crate) plan: MarketPlan,
}

/// Load the group and account and locate every account the market needs.
///
/// Only reads: nothing is subscribed or scheduled, so a failure here leaves
/// nothing behind.
pub(crate) async fn resolve_accounts(
    ctx: &BuilderContext,
    target: &BuilderTarget,
) -> Result<ResolvedAccounts, BuilderError> {
    let market = target.market.as_ref();
    info!(market = %market.qualified_symbol(), wallet = %target.wallet, "Resolving accounts");

    let group = load(ctx, facets::GROUP, target.group, |decoder, address, data| {
        decoder.decode_group(address, data)
    })
    .await?;
    let account = load(ctx, facets::ACCOUNT, target.account, |decoder, address, data| {
        decoder.decode_account(address, data)
    })
    .await?;

    let (order_owner, plan) = match market {
        Market::Serum(info) => {
            let base_token = find_token_account(ctx, target.wallet, &info.base, "base").await?;
            let quote_token = find_token_account(ctx, target.wallet, &info.quote, "quote").await?;
            let open_orders = with_deadline(
                LOCATOR,
                ctx.deadlines.fetch,
                ctx.locator.find_open_orders(market, target.wallet),
            )
            .await?
            .ok_or_else(|| BuilderError::MissingAccount {
                description: format!(
                    "serum open orders account owned by {} for market {}",
                    target.wallet,
                    market.qualified_symbol()
                ),
            })?;
            (
                open_orders,
                MarketPlan::Serum {
                    open_orders,
                    base_token,
                    quote_token,
                },
            )
        }
        Market::Spot(_) => {
            let slot = group
                .slot_by_spot_market(&market.address())
                .ok_or_else(|| not_listed(market))?
                .index;
            let open_orders = account.spot_open_orders_by_index(slot).ok_or_else(|| {
                BuilderError::MissingAccount {
                    description: format!(
                        "spot open orders in account {} for market {}",
                        account.address,
                        market.qualified_symbol()
                    ),
                }
            })?;
            (
                open_orders,
                MarketPlan::Spot {
                    slot,
                    open_orders,
                    all_open_orders: account.spot_open_orders(),
                },
            )
        }
        Market::Perp(_) => {
            let slot = group
                .slot_by_perp_market(&market.address())
                .ok_or_else(|| not_listed(market))?
                .index;
            (
                account.address,
                MarketPlan::Perp {
                    slot,
                    all_open_orders: account.spot_open_orders(),
                },
            )
        }
    };

    debug!(order_owner = %order_owner, ?plan, "Accounts resolved");
    Ok(ResolvedAccounts {
        group,
        account,
        order_owner,
        plan,
    })
}

/// Fetch and decode one record under the fetch deadline.
pub(crate) async fn load<T, D>(
    ctx: &BuilderContext,
    facet: &str,
    address: Address,
    decode: D,
) -> Result<T, StateError>
where
    T: Clone + Send + Sync + 'static,
    D: Fn(&dyn AccountDecoder, Address, &[u8]) -> Result<T, DecodeError> + Send + Sync + 'static,
{
    let decoder = Arc::clone(&ctx.decoder);
    let source = PullSource::single(
        facet,
        address,
        Arc::clone(&ctx.data),
        ctx.deadlines.fetch,
        move |data| decode(decoder.as_ref(), address, data),
    );
    let value = source.current().await?;
    Ok(Arc::try_unwrap(value).unwrap_or_else(|shared| T::clone(&shared)))
}

async fn find_token_account(
    ctx: &BuilderContext,
    wallet: Address,
    token: &Token,
    role: &str,
) -> Result<TokenAccount, BuilderError> {
    with_deadline(
        LOCATOR,
        ctx.deadlines.fetch,
        ctx.locator.find_largest_token_account(wallet, token),
    )
    .await?
    .ok_or_else(|| BuilderError::MissingAccount {
        description: format!("token account owned by {wallet} for {role} token {token}"),
    })
}

fn not_listed(market: &Market) -> BuilderError {
    BuilderError::MarketNotListed {
        market: market.qualified_symbol(),
    }
}
