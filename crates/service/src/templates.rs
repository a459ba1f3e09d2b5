#![forbid(unsafe_code)]

use crate::FormService;
use crate::outcome::{Outcome, ServiceResult};
use jf_core::{TemplateId, UserId, gate::certificate_errors, validate_template_fields};
use jf_storage::{
    CreateTemplateRequest, StoreError, Template, UpdateTemplateRequest,
};
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

/// Result of a publish: the published template, every including template
/// refreshed by the cascade, and the refresh that stopped it, if any.
/// Refresh is idempotent and re-triggered by the next publish, so a
/// partial cascade is recoverable.
#[derive(Clone, Debug, PartialEq)]
pub struct PublishReport {
    pub template: Template,
    pub refreshed: Vec<TemplateId>,
    pub failed: Option<RefreshFailure>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RefreshFailure {
    pub template: TemplateId,
    pub errors: Vec<String>,
}

impl FormService<'_> {
    pub fn create_template(&mut self, request: CreateTemplateRequest) -> ServiceResult<Template> {
        let errors = validate_template_fields(
            &request.name,
            request.kind,
            request.document_header.as_deref(),
        );
        if !errors.is_empty() {
            return Ok(Outcome::Invalid(errors));
        }
        let template = self.store.create_template(request)?;
        Ok(Outcome::Ok(template))
    }

    pub fn update_template(
        &mut self,
        template: TemplateId,
        request: UpdateTemplateRequest,
    ) -> ServiceResult<Template> {
        let current = self
            .store
            .get_template(template)?
            .ok_or(StoreError::UnknownTemplate)?;

        let name = request.name.clone().unwrap_or_else(|| current.name.clone());
        let document_header = request
            .document_header
            .clone()
            .unwrap_or_else(|| current.document_header.clone());
        let mut errors =
            validate_template_fields(&name, current.kind, document_header.as_deref());
        errors.extend(self.certificate_row_errors(&current)?);
        if !errors.is_empty() {
            return Ok(Outcome::Invalid(errors));
        }

        let updated = self.store.update_template(template, request)?;
        Ok(Outcome::Ok(updated))
    }

    /// Takes a public template back into editing, recording who did it.
    pub fn begin_edit_template(
        &mut self,
        template: TemplateId,
        user: UserId,
    ) -> ServiceResult<Template> {
        let current = self
            .store
            .get_template(template)?
            .ok_or(StoreError::UnknownTemplate)?;
        let updated =
            self.store
                .set_template_status(template, current.status.begin_edit(), Some(user))?;
        Ok(Outcome::Ok(updated))
    }

    /// Publishes a template and walks its includers breadth-first,
    /// re-validating and re-saving each; every refreshed template's own
    /// includers are enqueued in turn. A visited set bounds the walk on
    /// cyclic graphs.
    pub fn publish_template(&mut self, template: TemplateId) -> ServiceResult<PublishReport> {
        let current = self
            .store
            .get_template(template)?
            .ok_or(StoreError::UnknownTemplate)?;

        let mut errors = validate_template_fields(
            &current.name,
            current.kind,
            current.document_header.as_deref(),
        );
        errors.extend(self.certificate_row_errors(&current)?);
        if !errors.is_empty() {
            return Ok(Outcome::Invalid(errors));
        }

        let published =
            self.store
                .set_template_status(template, current.status.publish(), None)?;

        let mut refreshed = Vec::new();
        let mut failed = None;
        let mut visited = BTreeSet::from([template.as_i64()]);
        let mut queue: VecDeque<TemplateId> =
            self.store.templates_including(template)?.into();

        while let Some(ancestor) = queue.pop_front() {
            if !visited.insert(ancestor.as_i64()) {
                continue;
            }
            let Some(record) = self.store.get_template(ancestor)? else {
                continue;
            };

            let mut refresh_errors = validate_template_fields(
                &record.name,
                record.kind,
                record.document_header.as_deref(),
            );
            refresh_errors.extend(self.certificate_row_errors(&record)?);
            if !refresh_errors.is_empty() {
                failed = Some(RefreshFailure {
                    template: ancestor,
                    errors: refresh_errors,
                });
                break;
            }

            self.store.touch_template(ancestor)?;
            debug!(template = ancestor.as_i64(), "refreshed including template");
            refreshed.push(ancestor);
            queue.extend(self.store.templates_including(ancestor)?);
        }

        Ok(Outcome::Ok(PublishReport {
            template: published,
            refreshed,
            failed,
        }))
    }

    pub fn destroy_template(&mut self, template: TemplateId) -> ServiceResult<()> {
        self.store.destroy_template(template)?;
        Ok(Outcome::Ok(()))
    }

    /// Certificate allow-list check over the template's flattened rows, so
    /// offending kinds smuggled in through includes are caught as well.
    pub(crate) fn certificate_row_errors(
        &self,
        template: &Template,
    ) -> Result<Vec<String>, StoreError> {
        if !template.kind.is_certificate() {
            return Ok(Vec::new());
        }
        let rows = self.store.flatten_template(template.id)?;
        Ok(certificate_errors(&rows))
    }
}
