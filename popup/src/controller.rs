use std::rc::Rc;

use crate::{
    action::Action,
    host::Host,
    instance::Instance,
    options::OptionValue,
    Result,
};

/// Registry of the live popups of one document.
///
/// Every popup operation goes through the controller, which owns the
/// instances. Dropping the controller detaches all of them.
pub struct PopupController<H: Host> {
    host: Rc<H>,
    instances: Vec<Instance<H>>,
}

impl<H: Host> PopupController<H> {
    pub fn new(host: H) -> Self {
        Self {
            host: Rc::new(host),
            instances: Vec::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The popup attached to `owner`.
    pub fn get(&self, owner: &H::Element) -> Option<&Instance<H>> {
        self.instances.iter().find(|i| i.is_owned_by(owner))
    }

    /// Runs `action` for every element.
    ///
    /// Elements without a popup are skipped by every action but `create`.
    /// Returns the value produced for the last element that produced one,
    /// only getters and setters produce values.
    pub fn invoke<'e, I>(
        &mut self,
        elements: I,
        action: Action<H::Element>,
    ) -> Option<OptionValue<H::Element>>
    where
        I: IntoIterator<Item = &'e H::Element>,
        H::Element: 'e,
    {
        let mut result = None;
        for element in elements {
            if let Some(value) = self.invoke_one(element, &action) {
                result = Some(value);
            }
        }
        result
    }

    /// Like [`Self::invoke`] with an action name and an optional JSON argument.
    pub fn invoke_named<'e, I>(
        &mut self,
        elements: I,
        name: &str,
        value: Option<serde_json::Value>,
    ) -> Result<Option<OptionValue<H::Element>>>
    where
        I: IntoIterator<Item = &'e H::Element>,
        H::Element: 'e,
    {
        let action = Action::parse(name, value)?;
        Ok(self.invoke(elements, action))
    }

    fn invoke_one(
        &mut self,
        element: &H::Element,
        action: &Action<H::Element>,
    ) -> Option<OptionValue<H::Element>> {
        let Some(index) = self.instances.iter().position(|i| i.is_owned_by(element)) else {
            if let Action::Create(options) = action {
                let host = Rc::clone(&self.host);
                let instance = Instance::create(host, element.clone(), options.clone());
                self.instances.push(instance);
            }
            return None;
        };

        let instance = &self.instances[index];
        match action {
            Action::Create(options) | Action::Update(options) => {
                instance.update(options.clone());
                None
            }
            Action::Destroy => {
                self.instances.remove(index).destroy();
                None
            }
            Action::Call(method) => {
                instance.call(*method);
                None
            }
            Action::Get(key) => Some(instance.get_option(*key)),
            Action::Set(value) => Some(instance.set_option(value.clone())),
        }
    }
}
