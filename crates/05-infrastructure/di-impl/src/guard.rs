//! 单例构造协调
//!
//! 记录每个正在构造的单例类型由哪个线程持有，以及每个线程正在等待哪个类型。
//! 等待之前沿 "等待的类型 -> 持有线程 -> 该线程等待的类型" 链查找，
//! 链条回到当前线程时报告循环依赖，不进入阻塞。

use infrastructure_common::{DependencyError, TypeInfo};
use parking_lot::{Condvar, Mutex};
use std::any::TypeId;
use std::collections::HashMap;
use std::thread::{self, ThreadId};
use tracing::warn;

#[derive(Default)]
struct BuildState {
    /// 正在构造的类型及其持有线程
    owners: HashMap<TypeId, (ThreadId, TypeInfo)>,
    /// 阻塞中的线程及其等待的类型
    waiting: HashMap<ThreadId, TypeId>,
}

impl BuildState {
    /// 当前线程等待 `target` 是否会形成环，形成环时返回环上的类型链
    fn cycle_through(&self, me: ThreadId, target: TypeInfo) -> Option<String> {
        let mut chain = vec![target];
        let (mut holder, _) = *self.owners.get(&target.id)?;

        for _ in 0..=self.owners.len() {
            if holder == me {
                let closing = *chain.last()?;
                return Some(
                    std::iter::once(closing)
                        .chain(chain)
                        .map(|t| t.full_name)
                        .collect::<Vec<_>>()
                        .join(" -> "),
                );
            }
            let waited = self.waiting.get(&holder)?;
            let (next, waited_info) = *self.owners.get(waited)?;
            chain.push(waited_info);
            holder = next;
        }
        None
    }
}

/// 占用结果
pub(crate) enum Claim<'a, T> {
    /// 实例已可用
    Ready(T),
    /// 当前线程负责构造，释放时唤醒等待者
    Owned(BuildSlot<'a>),
}

/// 单例构造协调器
#[derive(Default)]
pub(crate) struct BuildCoordinator {
    state: Mutex<BuildState>,
    finished: Condvar,
}

impl BuildCoordinator {
    /// 获取类型的构造权
    ///
    /// `lookup` 在协调器锁内查询缓存；其他线程正在构造时阻塞等待，
    /// 构造失败后由下一个等待者重新尝试。
    pub(crate) fn claim<T>(
        &self,
        type_info: TypeInfo,
        lookup: impl Fn() -> Option<T>,
    ) -> Result<Claim<'_, T>, DependencyError> {
        let me = thread::current().id();
        let mut state = self.state.lock();

        loop {
            if let Some(ready) = lookup() {
                return Ok(Claim::Ready(ready));
            }
            if !state.owners.contains_key(&type_info.id) {
                state.owners.insert(type_info.id, (me, type_info));
                return Ok(Claim::Owned(BuildSlot {
                    coordinator: self,
                    type_id: type_info.id,
                }));
            }
            if let Some(chain) = state.cycle_through(me, type_info) {
                warn!("跨线程构造形成循环依赖: {}", chain);
                return Err(DependencyError::CircularDependency {
                    dependency_chain: chain,
                });
            }

            state.waiting.insert(me, type_info.id);
            self.finished.wait(&mut state);
            state.waiting.remove(&me);
        }
    }
}

/// 构造权，释放时移除持有记录并唤醒等待线程
pub(crate) struct BuildSlot<'a> {
    coordinator: &'a BuildCoordinator,
    type_id: TypeId,
}

impl Drop for BuildSlot<'_> {
    fn drop(&mut self) {
        self.coordinator.state.lock().owners.remove(&self.type_id);
        self.coordinator.finished.notify_all();
    }
}
