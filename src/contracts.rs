//! Compile-time ABI definitions for on-chain contracts via Alloy `sol!`.
//!
//! Every interface here is the minimal slice of the deployed contract the
//! workflows actually call; encoding mistakes surface as compile errors.

#![allow(clippy::too_many_arguments)]

use alloy::sol;

// ---------------------------------------------------------------------------
// Lending pool addresses provider
// ---------------------------------------------------------------------------

sol! {
    /// Registry contract that owns the market's current pool address.
    ///
    /// The pool is upgradeable, so its address is resolved through this
    /// registry at runtime instead of being configured directly. The
    /// deployed registry answers `getLendingPool()`, not `getPool()`.
    #[sol(rpc)]
    interface IAddressesProvider {
        function getLendingPool() external view returns (address);
    }
}

// ---------------------------------------------------------------------------
// Lending pool
// ---------------------------------------------------------------------------

sol! {
    /// Lending pool contract, the core deposit/borrow/repay entry point.
    #[sol(rpc)]
    interface IPool {
        /// Deposit asset as collateral.
        function deposit(
            address asset,
            uint256 amount,
            address onBehalfOf,
            uint16 referralCode
        ) external;

        /// Draw a loan against deposited collateral.
        function borrow(
            address asset,
            uint256 amount,
            uint256 interestRateMode,
            uint16 referralCode,
            address onBehalfOf
        ) external;

        /// Repay borrowed asset. Returns the amount actually repaid.
        function repay(
            address asset,
            uint256 amount,
            uint256 interestRateMode,
            address onBehalfOf
        ) external returns (uint256);

        /// Get aggregated user position data, denominated in the market's
        /// base currency.
        function getUserAccountData(address user) external view returns (
            uint256 totalCollateralETH,
            uint256 totalDebtETH,
            uint256 availableBorrowsETH,
            uint256 currentLiquidationThreshold,
            uint256 ltv,
            uint256 healthFactor
        );
    }
}

// ---------------------------------------------------------------------------
// ERC-20 and wrapped native token
// ---------------------------------------------------------------------------

sol! {
    /// Minimal ERC-20 surface: spending grants and balance reads.
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
}

sol! {
    /// Wrapped native token. `deposit` mints wrapped units one-for-one
    /// against the native value attached to the call.
    #[sol(rpc)]
    interface IWrappedNative {
        function deposit() external payable;
        function withdraw(uint256 amount) external;
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}

// ---------------------------------------------------------------------------
// Chainlink Aggregator V3
// ---------------------------------------------------------------------------

sol! {
    /// Chainlink price feed interface.
    #[sol(rpc)]
    interface IAggregatorV3 {
        function latestRoundData() external view returns (
            uint80 roundId,
            int256 answer,
            uint256 startedAt,
            uint256 updatedAt,
            uint80 answeredInRound
        );

        function decimals() external view returns (uint8);
    }
}

// ---------------------------------------------------------------------------
// Swap router
// ---------------------------------------------------------------------------

sol! {
    /// Single-hop exact-input entry point of the concentrated-liquidity
    /// swap router.
    #[sol(rpc)]
    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        function exactInputSingle(ExactInputSingleParams calldata params)
            external
            payable
            returns (uint256 amountOut);
    }
}
