use tracing::{debug, info};

use super::repo_types::{Medication, MedicationError, MedicationId, MedicationPatch, NewMedication};

/// The user's current medication list, in the order items were added.
#[derive(Debug, Default)]
pub struct MedicationList {
    items: Vec<Medication>,
}

impl MedicationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, new: NewMedication) -> Result<&Medication, MedicationError> {
        let name = new.name.trim();
        if name.is_empty() {
            debug!("medication rejected: blank name");
            return Err(MedicationError::BlankName);
        }
        let measurement = new.measurement.trim();
        if measurement.is_empty() {
            return Err(MedicationError::BlankMeasurement);
        }

        let med = Medication {
            id: MedicationId::generate(),
            name: name.to_string(),
            dosage: new.dosage.trim().to_string(),
            measurement: measurement.to_string(),
            route: new.route,
            description: new.description,
            category: new.category,
        };
        info!(medication_id = %med.id, medication = %med.name, "medication added");
        self.items.push(med);
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    pub fn get(&self, id: &MedicationId) -> Option<&Medication> {
        self.items.iter().find(|m| &m.id == id)
    }

    pub fn list(&self) -> &[Medication] {
        &self.items
    }

    /// Applies every field present in `patch`. Nothing changes when any
    /// field is invalid.
    pub fn update(
        &mut self,
        id: &MedicationId,
        patch: MedicationPatch,
    ) -> Result<&Medication, MedicationError> {
        let med = self
            .items
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| MedicationError::NotFound(id.clone()))?;

        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(MedicationError::BlankName);
        }
        if patch.measurement.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(MedicationError::BlankMeasurement);
        }

        if let Some(name) = patch.name {
            med.name = name.trim().to_string();
        }
        if let Some(dosage) = patch.dosage {
            med.dosage = dosage.trim().to_string();
        }
        if let Some(measurement) = patch.measurement {
            med.measurement = measurement.trim().to_string();
        }
        if let Some(route) = patch.route {
            med.route = route;
        }
        if let Some(description) = patch.description {
            med.description = Some(description);
        }
        if let Some(category) = patch.category {
            med.category = Some(category);
        }
        debug!(medication_id = %id, "medication updated");
        Ok(med)
    }

    pub fn remove(&mut self, id: &MedicationId) -> Option<Medication> {
        let pos = self.items.iter().position(|m| &m.id == id)?;
        let med = self.items.remove(pos);
        info!(medication_id = %id, "medication removed");
        Some(med)
    }
}
