//! 静态依赖图
//!
//! 在构造任何实例之前，根据注册项声明的依赖校验整张图：
//! 不可解析的必需依赖和循环依赖都会被确定性地报告，随后按拓扑顺序构造单例。

use crate::registry::{Dependency, TypeRegistration};
use infrastructure_common::{DependencyError, TypeInfo};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// 依赖图节点
#[derive(Debug, Clone)]
pub struct DependencyGraphNode {
    /// 组件类型
    pub type_info: TypeInfo,
    /// 声明的依赖
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// 依赖图
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<DependencyGraphNode>,
    index: HashMap<TypeId, usize>,
    constants: HashSet<TypeId>,
}

impl DependencyGraph {
    /// 创建空依赖图
    pub fn new() -> Self {
        Self::default()
    }

    /// 按注册顺序从注册项构建依赖图
    pub fn from_registrations<'a>(
        registrations: impl IntoIterator<Item = &'a TypeRegistration>,
    ) -> Self {
        let mut graph = Self::new();
        for registration in registrations {
            graph.add_node(registration.type_info, registration.dependencies.clone());
        }
        graph
    }

    /// 添加节点，重复的类型保留首次添加的依赖声明
    pub fn add_node(&mut self, type_info: TypeInfo, dependencies: Vec<Dependency>) {
        if self.index.contains_key(&type_info.id) {
            return;
        }
        self.index.insert(type_info.id, self.nodes.len());
        self.nodes.push(DependencyGraphNode {
            type_info,
            dependencies,
        });
    }

    /// 标记常量类型，常量无需构造，也不会继续展开依赖
    pub fn with_constants(mut self, constants: impl IntoIterator<Item = TypeId>) -> Self {
        self.constants.extend(constants);
        self
    }

    /// 节点数量
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 按注册顺序遍历节点
    pub fn nodes(&self) -> &[DependencyGraphNode] {
        &self.nodes
    }

    fn is_known(&self, type_id: TypeId) -> bool {
        self.constants.contains(&type_id) || self.index.contains_key(&type_id)
    }

    /// 校验依赖图
    ///
    /// 先报告第一个不可解析的必需依赖，再报告第一个循环。
    pub fn validate(&self) -> Result<(), DependencyError> {
        for node in &self.nodes {
            for dependency in &node.dependencies {
                if !dependency.optional && !self.is_known(dependency.type_info.id) {
                    warn!(
                        "依赖图校验失败: {} 依赖未注册的 {}",
                        node.type_info, dependency.type_info
                    );
                    return Err(DependencyError::UnresolvableDependency {
                        type_name: dependency.type_info.full_name.to_string(),
                        required_by: Some(node.type_info.full_name.to_string()),
                    });
                }
            }
        }
        self.topological_order().map(|_| ())
    }

    /// 拓扑顺序：依赖先于依赖者，常量类型不出现在结果中
    pub fn topological_order(&self) -> Result<Vec<TypeInfo>, DependencyError> {
        let mut marks = HashMap::with_capacity(self.nodes.len());
        let mut path = Vec::new();
        let mut order = Vec::with_capacity(self.nodes.len());

        for (index, node) in self.nodes.iter().enumerate() {
            if self.constants.contains(&node.type_info.id) {
                continue;
            }
            self.visit(index, &mut marks, &mut path, &mut order)?;
        }

        debug!("依赖图拓扑排序完成: {} 个节点", order.len());
        Ok(order)
    }

    fn visit(
        &self,
        index: usize,
        marks: &mut HashMap<TypeId, Mark>,
        path: &mut Vec<TypeInfo>,
        order: &mut Vec<TypeInfo>,
    ) -> Result<(), DependencyError> {
        let node = &self.nodes[index];
        match marks.get(&node.type_info.id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path
                    .iter()
                    .position(|t| t.id == node.type_info.id)
                    .unwrap_or(0);
                let chain = path[start..]
                    .iter()
                    .chain(std::iter::once(&node.type_info))
                    .map(|t| t.full_name)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                warn!("依赖图存在循环: {}", chain);
                return Err(DependencyError::CircularDependency {
                    dependency_chain: chain,
                });
            }
            None => {}
        }

        marks.insert(node.type_info.id, Mark::Visiting);
        path.push(node.type_info);

        for dependency in &node.dependencies {
            if self.constants.contains(&dependency.type_info.id) {
                continue;
            }
            if let Some(&next) = self.index.get(&dependency.type_info.id) {
                self.visit(next, marks, path, order)?;
            }
        }

        path.pop();
        marks.insert(node.type_info.id, Mark::Done);
        order.push(node.type_info);
        Ok(())
    }
}
