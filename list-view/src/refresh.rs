/// 刷新令牌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(pub u32);

/// 刷新守卫 - 只接受最近一次发起的请求结果
///
/// 自动刷新和手动刷新可能同时在途，先发起的请求可能后返回；
/// 调用方在发起请求时领取令牌，返回时用令牌判断结果是否过期。
#[derive(Debug, Clone, Default)]
pub struct RefreshGuard {
    latest: u32,
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发起新请求，之前的令牌全部失效
    pub fn begin(&mut self) -> RefreshTicket {
        self.latest = self.latest.wrapping_add(1);
        RefreshTicket(self.latest)
    }

    /// 令牌是否属于最近一次请求
    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.latest
    }
}
