/// 表現代理場景
///
/// 替代渲染與物理協作者：記錄每個技能碰撞體的表現物件，
/// 並以圓形重疊判定產生進入觸發事件

use hashbrown::HashSet;
use skill_execution::{
    BodyHandle, CollisionEvent, ItemId, Result, SkillError, VisualBackend, VisualHandle,
};
use std::collections::BTreeMap;
use vek::Vec3;

/// 預設觸發半徑
pub const DEFAULT_TRIGGER_RADIUS: f32 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Proxy {
    pub template: String,
    pub position: Vec3<f32>,
    pub yaw: f32,
    pub collider_enabled: bool,
    pub item: Option<ItemId>,
    pub destroy_at: Option<f64>,
}

#[derive(Debug)]
pub struct ProxyScene {
    proxies: BTreeMap<VisualHandle, Proxy>,
    next_handle: u64,
    now: f64,
    trigger_radius: f32,
    /// 設定後只接受清單內的模板
    known_templates: Option<HashSet<String>>,
    /// 目前重疊中的 (表現物件, 物理身體)
    contacts: HashSet<(VisualHandle, BodyHandle)>,
}

impl Default for ProxyScene {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_RADIUS)
    }
}

impl ProxyScene {
    pub fn new(trigger_radius: f32) -> Self {
        Self {
            proxies: BTreeMap::new(),
            next_handle: 0,
            now: 0.0,
            trigger_radius,
            known_templates: None,
            contacts: HashSet::new(),
        }
    }

    pub fn with_known_templates<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_templates = Some(templates.into_iter().map(Into::into).collect());
        self
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&Proxy> {
        self.proxies.get(&handle)
    }

    pub fn proxies(&self) -> impl Iterator<Item = (&VisualHandle, &Proxy)> {
        self.proxies.iter()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// 推進場景時間並移除到期的表現物件
    pub fn advance(&mut self, now: f64) {
        self.now = now;
        let expired: Vec<VisualHandle> = self
            .proxies
            .iter()
            .filter(|(_, proxy)| proxy.destroy_at.map_or(false, |at| at <= now))
            .map(|(handle, _)| *handle)
            .collect();
        for handle in expired {
            self.remove(handle);
        }
    }

    /// 找出這一幀新進入重疊的 (碰撞體, 物理身體)
    pub fn detect_triggers(&mut self, bodies: &[(BodyHandle, Vec3<f32>, f32)]) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        let mut touching = HashSet::new();

        for (handle, proxy) in &self.proxies {
            let item = match (proxy.collider_enabled, proxy.item) {
                (true, Some(item)) => item,
                _ => continue,
            };
            for (body, position, radius) in bodies {
                let reach = self.trigger_radius + *radius;
                if (*position - proxy.position).magnitude_squared() > reach * reach {
                    continue;
                }
                let key = (*handle, *body);
                touching.insert(key);
                if !self.contacts.contains(&key) {
                    events.push(CollisionEvent { body: *body, item });
                }
            }
        }

        self.contacts = touching;
        events
    }

    fn remove(&mut self, handle: VisualHandle) {
        self.proxies.remove(&handle);
        self.contacts.retain(|(h, _)| *h != handle);
    }
}

impl VisualBackend for ProxyScene {
    fn instantiate_visual(&mut self, template: &str, position: Vec3<f32>, yaw: f32) -> Result<VisualHandle> {
        if let Some(known) = &self.known_templates {
            if !known.contains(template) {
                return Err(SkillError::MissingTemplate(template.to_string()));
            }
        }
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.proxies.insert(
            handle,
            Proxy {
                template: template.to_string(),
                position,
                yaw,
                collider_enabled: false,
                item: None,
                destroy_at: None,
            },
        );
        Ok(handle)
    }

    fn destroy_visual(&mut self, handle: VisualHandle) {
        self.remove(handle);
    }

    fn destroy_visual_after(&mut self, handle: VisualHandle, seconds: f32) {
        let at = self.now + f64::from(seconds);
        if let Some(proxy) = self.proxies.get_mut(&handle) {
            proxy.destroy_at = Some(at);
        }
    }

    fn move_visual(&mut self, handle: VisualHandle, position: Vec3<f32>) {
        if let Some(proxy) = self.proxies.get_mut(&handle) {
            proxy.position = position;
        }
    }

    fn set_collider_enabled(&mut self, handle: VisualHandle, enabled: bool) {
        if let Some(proxy) = self.proxies.get_mut(&handle) {
            proxy.collider_enabled = enabled;
        }
    }

    fn bind_item(&mut self, handle: VisualHandle, item: ItemId) {
        if let Some(proxy) = self.proxies.get_mut(&handle) {
            proxy.item = Some(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_execution::ExecutionId;

    fn item_id() -> ItemId {
        ItemId {
            execution: ExecutionId::new(),
            seq: 3,
        }
    }

    #[test]
    fn test_trigger_enter_fires_once_per_contact() {
        let mut scene = ProxyScene::new(1.0);
        let handle = scene.instantiate_visual("AbilityItems/zone", Vec3::zero(), 0.0).unwrap();
        let item = item_id();
        scene.bind_item(handle, item);
        scene.set_collider_enabled(handle, true);

        let bodies = vec![(BodyHandle(1), Vec3::new(1.5, 0.0, 0.0), 0.5)];
        assert_eq!(
            scene.detect_triggers(&bodies),
            vec![CollisionEvent { body: BodyHandle(1), item }]
        );
        // 持續重疊不重複觸發
        assert!(scene.detect_triggers(&bodies).is_empty());

        // 離開後再進入會再觸發
        let away = vec![(BodyHandle(1), Vec3::new(10.0, 0.0, 0.0), 0.5)];
        assert!(scene.detect_triggers(&away).is_empty());
        assert_eq!(scene.detect_triggers(&bodies).len(), 1);
    }

    #[test]
    fn test_disabled_or_unbound_collider_never_triggers() {
        let mut scene = ProxyScene::new(1.0);
        let unbound = scene.instantiate_visual("AbilityItems/a", Vec3::zero(), 0.0).unwrap();
        scene.set_collider_enabled(unbound, true);
        let disabled = scene.instantiate_visual("AbilityItems/b", Vec3::zero(), 0.0).unwrap();
        scene.bind_item(disabled, item_id());

        let bodies = vec![(BodyHandle(1), Vec3::zero(), 0.5)];
        assert!(scene.detect_triggers(&bodies).is_empty());
    }

    #[test]
    fn test_unknown_template_rejected() {
        let mut scene = ProxyScene::default().with_known_templates(["AbilityItems/fireball"]);
        assert!(scene.instantiate_visual("AbilityItems/fireball", Vec3::zero(), 0.0).is_ok());
        let err = scene.instantiate_visual("AbilityItems/ghost", Vec3::zero(), 0.0).unwrap_err();
        assert!(matches!(err, SkillError::MissingTemplate(_)));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_delayed_destroy() {
        let mut scene = ProxyScene::default();
        scene.advance(2.0);
        let handle = scene.instantiate_visual("Skills/cast", Vec3::zero(), 0.0).unwrap();
        scene.destroy_visual_after(handle, 1.5);

        scene.advance(3.0);
        assert!(scene.get(handle).is_some());
        scene.advance(3.5);
        assert!(scene.get(handle).is_none());
    }
}
